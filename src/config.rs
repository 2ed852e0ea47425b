//! 設定モジュール
//!
//! サンドボックス全体の設定（ワールドサイズ、物理パラメータ、生成時の既定値、初期シーン）を定義します。
//! すべての項目に既定値があり、JSONでは一部の項目だけを指定できます。

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::physics::entity::Material;
use crate::physics::shape::Shape;
use crate::utils::logger::LogLevel;
use crate::utils::math::degrees_to_radians;

/// サンドボックス設定
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// ワールド設定
    pub world: WorldConfig,

    /// 物理設定
    pub physics: PhysicsConfig,

    /// 生成設定
    pub spawn: SpawnConfig,

    /// 初期シーン設定
    pub scene: SceneConfig,

    /// ログレベル
    pub log_level: LogLevel,
}

/// ワールド設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// ワールドの幅（ピクセル）
    pub width: u32,

    /// ワールドの高さ（ピクセル）
    pub height: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// 物理設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// 重力定数
    pub gravity: f32,

    /// 1秒あたりのティック数
    pub ticks_per_second: f32,

    /// 移動入力の力の倍率
    pub move_force: f32,

    /// 1ティックあたりの回転量（ラジアン）
    pub rotation_step: f32,

    /// 最大速度（1ティックあたり）
    pub max_speed: f32,

    /// 位置補正の割合
    pub correction_rate: f32,

    /// 許容する貫通量
    pub penetration_slop: f32,

    /// 跳ね返りが起きる最小の接近速度
    pub resting_speed: f32,

    /// 1フレームあたりの最大ティック数
    pub max_ticks_per_frame: Option<usize>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.1,
            ticks_per_second: 60.0,
            move_force: 5.0,
            rotation_step: degrees_to_radians(1.0),
            max_speed: 50.0,
            correction_rate: 1.0,
            penetration_slop: 0.01,
            resting_speed: 1.0,
            max_ticks_per_frame: None,
        }
    }
}

/// 生成設定（クリックで生成されるエンティティの既定値）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// 円の半径
    pub circle_radius: f32,

    /// 箱の半幅
    pub box_half_width: f32,

    /// 箱の半長
    pub box_half_length: f32,

    /// 質量
    pub mass: f32,

    /// 材質
    pub material: Material,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            circle_radius: 10.0,
            box_half_width: 50.0,
            box_half_length: 10.0,
            mass: 1.0,
            material: Material::default(),
        }
    }
}

impl SpawnConfig {
    /// 円の形状
    pub fn circle_shape(&self) -> Shape {
        Shape::Circle {
            radius: self.circle_radius,
        }
    }

    /// 箱の形状
    pub fn box_shape(&self) -> Shape {
        Shape::Box {
            half_width: self.box_half_width,
            half_length: self.box_half_length,
        }
    }
}

/// 初期シーン設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// 乱数シード
    pub seed: u64,

    /// 円の数
    pub circles: usize,

    /// 箱の数
    pub boxes: usize,

    /// 床を置くかどうか
    pub floor: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            circles: 2,
            boxes: 1,
            floor: true,
        }
    }
}

impl SandboxConfig {
    /// JSON文字列から設定を読み込み、検証する
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SandboxConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// JSON文字列に変換
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 設定を検証
    pub fn validate(&self) -> Result<()> {
        if self.world.width == 0 || self.world.height == 0 {
            return Err(ConfigError::InvalidWorldSize {
                width: self.world.width,
                height: self.world.height,
            });
        }

        self.physics.validate()?;

        self.spawn.circle_shape().validate()?;
        self.spawn.box_shape().validate()?;
        if !(self.spawn.mass.is_finite() && self.spawn.mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(self.spawn.mass));
        }
        self.spawn.material.validate()?;

        Ok(())
    }
}

impl PhysicsConfig {
    /// 物理パラメータを検証
    pub fn validate(&self) -> Result<()> {
        if !(self.ticks_per_second.is_finite() && self.ticks_per_second > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.ticks_per_second));
        }

        for (name, value) in [
            ("gravity", self.gravity),
            ("move_force", self.move_force),
            ("rotation_step", self.rotation_step),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidPhysics { name, value });
            }
        }

        for (name, value) in [
            ("max_speed", self.max_speed),
            ("penetration_slop", self.penetration_slop),
            ("resting_speed", self.resting_speed),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidPhysics { name, value });
            }
        }

        if self.max_speed == 0.0 {
            return Err(ConfigError::InvalidPhysics {
                name: "max_speed",
                value: self.max_speed,
            });
        }

        if !(self.correction_rate.is_finite() && (0.0..=1.0).contains(&self.correction_rate)) {
            return Err(ConfigError::InvalidPhysics {
                name: "correction_rate",
                value: self.correction_rate,
            });
        }

        if self.max_ticks_per_frame == Some(0) {
            return Err(ConfigError::InvalidPhysics {
                name: "max_ticks_per_frame",
                value: 0.0,
            });
        }

        Ok(())
    }
}
