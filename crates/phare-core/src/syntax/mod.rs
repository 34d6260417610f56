pub mod lexer;
pub mod scanner;
pub mod token;
