use derive_more::{Display, Error};

/// `n` is not one of the allowed grid sizes (`1, 4, 9, 16, 25, 36, 49, 64`).
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[display("wrong grid size: {size}")]
pub struct GridSizeError {
    pub size: usize,
}
