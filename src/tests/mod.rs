mod assignment_tests;
mod random_networks_test;
mod utils;
