mod aggregate;

pub use aggregate::AggregateStore;
