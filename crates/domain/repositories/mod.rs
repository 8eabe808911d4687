pub mod affiliates;
