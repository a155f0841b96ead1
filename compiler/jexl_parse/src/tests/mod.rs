mod parser;
mod statements;
