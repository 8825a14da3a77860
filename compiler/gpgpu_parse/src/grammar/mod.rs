//! Grammar productions, split by statement and expression level.

mod expr;
mod stmt;
