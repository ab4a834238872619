pub mod spartan3;
