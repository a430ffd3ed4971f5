pub mod run_outcome;
