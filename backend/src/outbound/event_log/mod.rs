//! `rdkafka`-backed `EventLog` producer and the three consumer poll loops.

pub mod consumers;
mod producer;

pub use producer::KafkaEventLog;
