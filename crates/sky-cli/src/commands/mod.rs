pub mod cosmo_table;
pub mod fits_matrix;
pub mod latex;
