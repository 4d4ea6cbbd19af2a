/// 実行環境の判定と環境設定
pub mod environment;

pub use environment::{get_environment, Environment, EnvironmentConfig};
