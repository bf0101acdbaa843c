pub mod compiler;
pub mod decompiler;
pub mod model;
