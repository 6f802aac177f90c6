pub mod build;
pub mod develop;
pub mod doc;
pub mod prepare;
pub mod prune;
pub mod run;
pub mod stop;
pub mod testing;
pub mod update;
