pub mod algox;
pub mod board;
pub mod dlx;
pub mod solver;
pub mod validate;

// Necessary to export the modules to be integration tested in 'tests'
