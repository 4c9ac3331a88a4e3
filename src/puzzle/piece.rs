use crate::puzzle::cube::{dot, quarter_turn, Color, Coord, Direction, Face};
use crate::puzzle::facelet::FaceletState;
use cgmath::{Deg, Matrix4, Vector3};
use enum_map::EnumMap;
use itertools::iproduct;

/// Index of a piece in its puzzle's piece list. Stable for the life of the
/// puzzle.
pub type PieceId = usize;

/// One colour per outward direction, `None` where the side is hidden inside
/// the cube.
pub type PieceColors = EnumMap<Face, Option<Color>>;

/// The 26 visible lattice positions, every coordinate in -1..=1 except the
/// core.
pub fn positions() -> impl Iterator<Item = Coord> {
    iproduct!(-1..=1i8, -1..=1i8, -1..=1i8)
        .map(|(x, y, z)| Vector3::new(x, y, z))
        .filter(|&p| p != Vector3::new(0, 0, 0))
}

/// Whether a piece at `position` is carried by a turn of `face`.
pub fn in_layer(position: Coord, face: Face) -> bool {
    dot(position, face.normal()) == 1
}

/// The colours visible on a piece at `position`, read off the facelets.
pub fn colors_of_piece(position: Coord, state: &FaceletState) -> PieceColors {
    EnumMap::from_fn(|face: Face| {
        in_layer(position, face).then(|| state.sticker_at(face, position))
    })
}

/// A partial rotation a renderer should draw the piece with while its layer
/// is turning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceAnimation {
    /// the axis the piece is turning around
    pub axis: Vector3<f32>,
    /// how far it has turned so far
    pub angle: Deg<f32>,
}

/// A single cubie.
#[derive(Debug, Clone)]
pub struct Piece {
    /// Where the piece started; identifies it.
    home: Coord,
    position: Coord,
    /// For each direction the piece's sides faced at `home`, the direction
    /// that side faces now.
    orientation: EnumMap<Face, Face>,
    /// Colours the piece showed at `home`.
    home_colors: PieceColors,
    colors: PieceColors,
    animation: Option<PieceAnimation>,
}

impl Piece {
    pub fn new(home: Coord, state: &FaceletState) -> Self {
        let colors = colors_of_piece(home, state);
        Self {
            home,
            position: home,
            orientation: EnumMap::from_fn(|face| face),
            home_colors: colors.clone(),
            colors,
            animation: None,
        }
    }

    pub fn home(&self) -> Coord {
        self.home
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn colors(&self) -> &PieceColors {
        &self.colors
    }

    pub fn animation(&self) -> Option<&PieceAnimation> {
        self.animation.as_ref()
    }

    /// Colours obtained by carrying the piece's starting colours along with
    /// every turn it took, without looking at the facelets.
    pub fn tracked_colors(&self) -> PieceColors {
        let mut colors = EnumMap::default();
        for (from, &to) in self.orientation.iter() {
            colors[to] = self.home_colors[from];
        }
        colors
    }

    /// Moves the piece one quarter turn of `face`. Pieces outside the layer
    /// are left alone.
    pub(crate) fn twist(&mut self, face: Face, direction: Direction) {
        if !in_layer(self.position, face) {
            return;
        }
        self.position = quarter_turn(self.position, face, direction);
        for (_, cur) in self.orientation.iter_mut() {
            *cur = cur.turn(face, direction);
        }
    }

    /// Re-derives the visible colours from the facelets after a settle.
    pub(crate) fn refresh_colors(&mut self, state: &FaceletState) {
        self.colors = colors_of_piece(self.position, state);
    }

    pub(crate) fn set_animation(&mut self, animation: PieceAnimation) {
        self.animation = Some(animation);
    }

    pub(crate) fn reset_animation(&mut self) {
        self.animation = None;
    }

    /// Model transform for the piece's current partial rotation about the
    /// cube centre; the identity once settled.
    pub fn transform(&self) -> Matrix4<f32> {
        match &self.animation {
            Some(animation) => Matrix4::from_axis_angle(animation.axis, animation.angle),
            None => Matrix4::from_scale(1.0),
        }
    }
}

/// Ids of the pieces a turn of `face` carries. Purely positional.
pub fn pieces_in_layer(pieces: &[Piece], face: Face) -> Vec<PieceId> {
    pieces
        .iter()
        .enumerate()
        .filter(|(_, piece)| in_layer(piece.position, face))
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn solved_pieces() -> Vec<Piece> {
        let state = FaceletState::solved();
        positions().map(|p| Piece::new(p, &state)).collect()
    }

    #[test]
    fn twenty_six_pieces() {
        assert_eq!(positions().count(), 26);
        let state = FaceletState::solved();
        let stickers: usize = positions()
            .map(|p| colors_of_piece(p, &state).values().flatten().count())
            .sum();
        assert_eq!(stickers, 54);
    }

    #[test]
    fn layers_hold_nine() {
        let pieces = solved_pieces();
        for face in Face::ALL {
            assert_eq!(pieces_in_layer(&pieces, face).len(), 9);
        }
    }

    #[test]
    fn solved_corner_colors() {
        let state = FaceletState::solved();
        let colors = colors_of_piece(Vector3::new(1, 1, 1), &state);
        assert_eq!(colors[Face::R], Some(Color::Red));
        assert_eq!(colors[Face::U], Some(Color::White));
        assert_eq!(colors[Face::F], Some(Color::Green));
        assert_eq!(colors[Face::L], None);
        assert_eq!(colors[Face::D], None);
        assert_eq!(colors[Face::B], None);
    }

    #[test]
    fn twisting_outside_the_layer_does_nothing() {
        let state = FaceletState::solved();
        let mut piece = Piece::new(Vector3::new(-1, 0, 1), &state);
        piece.twist(Face::R, Direction::Clockwise);
        assert_eq!(piece.position(), Vector3::new(-1, 0, 1));
        assert_eq!(&piece.tracked_colors(), piece.colors());
    }

    /// The front-right edge goes to the top-right under R, keeping its red
    /// side on R and turning its green side up.
    #[test]
    fn r_moves_front_right_edge_up() {
        let state = FaceletState::solved();
        let mut piece = Piece::new(Vector3::new(1, 0, 1), &state);
        piece.twist(Face::R, Direction::Clockwise);
        assert_eq!(piece.position(), Vector3::new(1, 1, 0));
        let tracked = piece.tracked_colors();
        assert_eq!(tracked[Face::R], Some(Color::Red));
        assert_eq!(tracked[Face::U], Some(Color::Green));
        assert_eq!(tracked[Face::F], None);
    }

    #[test]
    fn settled_transform_is_identity() {
        let state = FaceletState::solved();
        let mut piece = Piece::new(Vector3::new(1, 1, 1), &state);
        assert_eq!(piece.transform(), Matrix4::from_scale(1.0));
        piece.set_animation(PieceAnimation {
            axis: Face::U.axis(),
            angle: Deg(-45.0),
        });
        assert_ne!(piece.transform(), Matrix4::from_scale(1.0));
        piece.reset_animation();
        assert_eq!(piece.animation(), None);
        assert_eq!(piece.transform(), Matrix4::from_scale(1.0));
    }
}
