pub mod cube;
pub mod facelet;
pub mod notation;
pub mod piece;
pub mod scramble;

use crate::puzzle::cube::Face;
use crate::puzzle::facelet::FaceletState;
use crate::puzzle::notation::Twist;
use crate::puzzle::piece::{pieces_in_layer, positions, Piece, PieceAnimation, PieceId};

/// Facelets and pieces of one 3x3x3. The facelets are the source of truth;
/// the pieces follow them and only ever change together with them.
#[derive(Debug, Clone)]
pub struct Puzzle {
    facelets: FaceletState,
    pieces: Vec<Piece>,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::make_solved()
    }
}

impl Puzzle {
    pub fn make_solved() -> Self {
        Self::from_facelets(FaceletState::solved())
    }

    pub fn from_facelets(facelets: FaceletState) -> Self {
        let pieces = positions().map(|p| Piece::new(p, &facelets)).collect();
        Self { facelets, pieces }
    }

    pub fn facelets(&self) -> &FaceletState {
        &self.facelets
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn layer(&self, face: Face) -> Vec<PieceId> {
        pieces_in_layer(&self.pieces, face)
    }

    pub fn is_solved(&self) -> bool {
        self.facelets.is_solved()
    }

    /// Whether every piece's colours, read off the facelets, agree with the
    /// colours it carried along through every twist.
    pub fn is_consistent(&self) -> bool {
        self.pieces
            .iter()
            .all(|piece| piece.tracked_colors() == *piece.colors())
    }

    /// Commits a whole twist: new facelets, new positions and colours for
    /// the turned layer, and no leftover partial rotation.
    pub fn twist(&mut self, twist: Twist) {
        let face = twist.face();
        let layer = self.layer(face);
        let facelets = self.facelets.apply(twist);
        let (direction, count) = twist.quarter_turns();
        for &id in &layer {
            let piece = &mut self.pieces[id];
            for _ in 0..count {
                piece.twist(face, direction);
            }
            piece.refresh_colors(&facelets);
            piece.reset_animation();
        }
        self.facelets = facelets;
    }

    pub(crate) fn animate(&mut self, layer: &[PieceId], animation: PieceAnimation) {
        for &id in layer {
            self.pieces[id].set_animation(animation);
        }
    }
}
