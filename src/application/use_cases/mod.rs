pub mod kol_catalog;
pub mod kol_columns;
pub mod kol_loader;
pub mod kol_query;
pub mod kol_stats;
