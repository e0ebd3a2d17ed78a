use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell id out of bounds")]
    InvalidCell,
    #[error("Mask grid is not square")]
    InvalidMaskShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
