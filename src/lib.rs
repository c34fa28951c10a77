/// A module containing discrete variables, factors and their algebra, and Bayes nets
pub mod core;
/// A module containing elimination orderings and the variable elimination algorithm
pub mod elimination;

#[cfg(test)]
mod tests;
