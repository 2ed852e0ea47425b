//! エラー定義モジュール
//!
//! シミュレーション中の数値的な縮退（ゼロ距離の法線など）はその場で処理されるため、
//! ここで扱うのは構築時に検出される設定エラーのみです。

use thiserror::Error;

/// 設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 質量が正の有限値ではない
    #[error("mass must be a positive finite number, got {0}")]
    NonPositiveMass(f32),

    /// 円の半径が不正
    #[error("circle radius must be a positive finite number, got {0}")]
    InvalidRadius(f32),

    /// 箱の半幅・半長が不正
    #[error("box half extents must be positive finite numbers, got ({half_width}, {half_length})")]
    InvalidExtents { half_width: f32, half_length: f32 },

    /// 材質係数が[0, 1]の範囲外
    #[error("material coefficient `{name}` must be within [0, 1], got {value}")]
    InvalidMaterial { name: &'static str, value: f32 },

    /// 物理パラメータが不正
    #[error("physics parameter `{name}` is invalid: {value}")]
    InvalidPhysics { name: &'static str, value: f32 },

    /// ティックレートが不正
    #[error("ticks per second must be a positive finite number, got {0}")]
    InvalidTickRate(f32),

    /// ワールドサイズが不正
    #[error("world size must be non-zero, got {width}x{height}")]
    InvalidWorldSize { width: u32, height: u32 },

    /// 設定JSONの解析エラー
    #[error("failed to parse sandbox configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// このクレートの結果型
pub type Result<T> = std::result::Result<T, ConfigError>;
