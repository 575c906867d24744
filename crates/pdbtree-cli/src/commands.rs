pub mod atoms;
pub mod batch;
pub mod convert;
pub mod info;
