mod pool;
#[cfg(test)]
mod tests;

pub use pool::*;
