pub mod composition;
pub mod reduced;
pub mod sequences;
pub mod sync;
