pub mod common;
pub mod export;
pub mod publish;
pub mod release;
pub mod table;
