pub mod latency_engine;
pub mod replay_engine;
