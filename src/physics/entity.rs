//! 物理エンティティモジュール
//!
//! 円と箱の両方を表す単一のエンティティ型を提供します。
//! 運動状態（位置、速度、蓄積された力、回転）と材質、衝突形状を保持し、
//! 形状ごとの見た目の反応（衝突フック）を実装します。

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::physics::dynamics::Integrator;
use crate::physics::shape::{Aabb, Shape, ShapeKind};
use crate::utils::math::{normalize_angle, Vector2};

/// 円の通常色
pub const CIRCLE_COLOR: [f32; 3] = [0.2, 0.4, 0.9];
/// 箱の通常色
pub const BOX_COLOR: [f32; 3] = [0.2, 0.7, 0.3];
/// 静的（キネマティック）エンティティの色
pub const KINEMATIC_COLOR: [f32; 3] = [0.45, 0.45, 0.45];
/// 衝突後の色
pub const HIT_COLOR: [f32; 3] = [0.9, 0.25, 0.2];

/// 衝突時に箱へ与える回転（ラジアン、見た目のみ）
const BOX_COLLISION_NUDGE: f32 = 0.02;
/// 箱の色を衝突色へ近づける割合
const BOX_TINT_RATE: f32 = 0.25;

/// 材質（反発・減衰・静止判定の係数）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// 反発係数（0: 跳ねない, 1: 完全弾性）
    pub bounciness: f32,
    /// 1ティックあたりの速度減衰率
    pub friction: f32,
    /// これ未満の速さは0に丸める
    pub deactivation: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            bounciness: 0.85,
            friction: 0.05,
            deactivation: 0.05,
        }
    }
}

impl Material {
    /// 係数がすべて[0, 1]の範囲内か検証
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("bounciness", self.bounciness),
            ("friction", self.friction),
            ("deactivation", self.deactivation),
        ] {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(ConfigError::InvalidMaterial { name, value });
            }
        }
        Ok(())
    }
}

/// 物理エンティティ
#[derive(Debug, Clone)]
pub struct Entity {
    /// エンティティID（シミュレーション内で一意）
    pub(crate) id: u32,
    /// 重心の位置（ワールド座標）
    pub(crate) position: Vector2,
    /// 速度（1ティックあたりの移動量）
    pub(crate) velocity: Vector2,
    /// 現在のティックで蓄積された外力
    pub(crate) force: Vector2,
    /// 回転角（ラジアン、描画用）
    pub rotation: f32,
    /// 描画色（RGB）
    pub color: [f32; 3],
    /// 材質
    pub material: Material,
    mass: f32,
    kinematic: bool,
    shape: Shape,
}

impl Entity {
    /// 新しいエンティティを作成
    ///
    /// # 引数
    ///
    /// * `id` - エンティティID
    /// * `shape` - 衝突形状（作成後は変更できない）
    /// * `position` - 初期位置
    /// * `mass` - 質量（正の有限値）
    /// * `material` - 材質
    ///
    /// # 戻り値
    ///
    /// * 設定が不正な場合は`ConfigError`
    pub fn new(id: u32, shape: Shape, position: Vector2, mass: f32, material: Material) -> Result<Self> {
        shape.validate()?;
        material.validate()?;
        if !(mass.is_finite() && mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(mass));
        }
        if !position.is_finite() {
            let value = if position.x.is_finite() { position.y } else { position.x };
            return Err(ConfigError::InvalidPhysics { name: "position", value });
        }

        let color = match shape.kind() {
            ShapeKind::Circle => CIRCLE_COLOR,
            ShapeKind::Box => BOX_COLOR,
        };

        Ok(Self {
            id,
            position,
            velocity: Vector2::ZERO,
            force: Vector2::ZERO,
            rotation: 0.0,
            color,
            material,
            mass,
            kinematic: false,
            shape,
        })
    }

    /// 円形エンティティを作成（質量1、既定の材質）
    pub fn circle(id: u32, position: Vector2, radius: f32) -> Result<Self> {
        Self::new(id, Shape::circle(radius)?, position, 1.0, Material::default())
    }

    /// 箱エンティティを作成（質量1、既定の材質）
    pub fn rect(id: u32, position: Vector2, half_width: f32, half_length: f32) -> Result<Self> {
        Self::new(id, Shape::rect(half_width, half_length)?, position, 1.0, Material::default())
    }

    /// キネマティック（無限質量）として設定
    pub fn set_kinematic(&mut self, kinematic: bool) -> &mut Self {
        self.kinematic = kinematic;

        // 静的になる場合は運動状態を捨てる
        if kinematic {
            self.velocity = Vector2::ZERO;
            self.force = Vector2::ZERO;
            self.color = KINEMATIC_COLOR;
        }

        self
    }

    /// 速度を設定（キネマティックの場合は無視）
    pub fn set_velocity(&mut self, velocity: Vector2) -> &mut Self {
        if !self.kinematic && velocity.is_finite() {
            self.velocity = velocity;
        }
        self
    }

    /// 回転角を設定
    pub fn set_rotation(&mut self, rotation: f32) -> &mut Self {
        if rotation.is_finite() {
            self.rotation = normalize_angle(rotation);
        }
        self
    }

    /// 回転させる
    pub fn rotate(&mut self, delta: f32) {
        self.set_rotation(self.rotation + delta);
    }

    /// 力を蓄積（キネマティックや非有限値の場合は無視）
    pub fn apply_force(&mut self, force: Vector2) {
        if self.kinematic {
            return;
        }
        if !force.is_finite() {
            log::warn!("entity {}: ignoring non-finite force {:?}", self.id, force);
            return;
        }
        self.force += force;
    }

    /// 1ティック分進める（既定の積分器を使用）
    pub fn update(&mut self) {
        Integrator::default().integrate(self);
    }

    /// 衝突時の見た目の反応
    ///
    /// 物理的な応答は衝突解決器が済ませているため、ここでは色と回転のみ変更します。
    ///
    /// # 引数
    ///
    /// * `other` - 相手の形状
    /// * `impact` - 静止接触の閾値を超える速さでぶつかったか（falseなら箱は変化しない）
    pub fn on_collision(&mut self, other: ShapeKind, impact: bool) {
        match self.shape {
            Shape::Circle { .. } => {
                if !self.kinematic {
                    self.color = HIT_COLOR;
                }
            }
            // 載っているだけの箱が回り続けないよう、衝突した時だけ反応する
            Shape::Box { .. } if impact => {
                for (channel, target) in self.color.iter_mut().zip(HIT_COLOR) {
                    *channel += (target - *channel) * BOX_TINT_RATE;
                }
                if !self.kinematic {
                    let direction = if other == ShapeKind::Circle { 1.0 } else { -1.0 };
                    self.rotate(BOX_COLLISION_NUDGE * direction);
                }
            }
            Shape::Box { .. } => {}
        }
    }

    /// エンティティID
    pub fn id(&self) -> u32 {
        self.id
    }

    /// 位置
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// 速度
    pub fn velocity(&self) -> Vector2 {
        self.velocity
    }

    /// 現在のティックで蓄積された外力
    pub fn force(&self) -> Vector2 {
        self.force
    }

    /// 質量
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// 逆質量（キネマティックの場合は0）
    pub fn inverse_mass(&self) -> f32 {
        if self.kinematic {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// キネマティックかどうか
    pub fn is_kinematic(&self) -> bool {
        self.kinematic
    }

    /// 衝突形状
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// 形状の種類
    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// 現在位置での境界ボックス
    pub fn bounds(&self) -> Aabb {
        self.shape.bounds(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::circle(1, Vector2::new(100.0, 100.0), 10.0).unwrap();
        assert_eq!(entity.kind(), ShapeKind::Circle);
        assert_eq!(entity.mass(), 1.0);
        assert_eq!(entity.inverse_mass(), 1.0);
        assert_eq!(entity.material, Material::default());
        assert_eq!(entity.velocity, Vector2::ZERO);
        assert!(!entity.is_kinematic());
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let shape = Shape::Circle { radius: 10.0 };
        let result = Entity::new(1, shape, Vector2::ZERO, 0.0, Material::default());
        assert!(matches!(result, Err(ConfigError::NonPositiveMass(_))));

        let result = Entity::new(1, shape, Vector2::ZERO, -2.0, Material::default());
        assert!(matches!(result, Err(ConfigError::NonPositiveMass(_))));

        let material = Material { bounciness: 1.5, ..Material::default() };
        let result = Entity::new(1, shape, Vector2::ZERO, 1.0, material);
        assert!(matches!(result, Err(ConfigError::InvalidMaterial { name: "bounciness", .. })));

        assert!(Entity::rect(1, Vector2::ZERO, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_kinematic_ignores_forces_and_velocity() {
        let mut entity = Entity::rect(1, Vector2::ZERO, 50.0, 10.0).unwrap();
        entity.set_velocity(Vector2::new(1.0, 1.0));
        entity.set_kinematic(true);

        assert_eq!(entity.velocity, Vector2::ZERO);
        assert_eq!(entity.inverse_mass(), 0.0);

        entity.apply_force(Vector2::new(0.0, -100.0));
        entity.set_velocity(Vector2::new(5.0, 0.0));
        assert_eq!(entity.force, Vector2::ZERO);
        assert_eq!(entity.velocity, Vector2::ZERO);
    }

    #[test]
    fn test_non_finite_force_is_ignored() {
        let mut entity = Entity::circle(1, Vector2::ZERO, 10.0).unwrap();
        entity.apply_force(Vector2::new(f32::NAN, 0.0));
        entity.apply_force(Vector2::new(1.0, 2.0));
        assert_eq!(entity.force, Vector2::new(1.0, 2.0));
    }

    #[test]
    fn test_update_at_rest_does_not_move() {
        let mut entity = Entity::circle(1, Vector2::new(10.0, 20.0), 10.0).unwrap();
        entity.update();
        assert_eq!(entity.position, Vector2::new(10.0, 20.0));
        assert_eq!(entity.velocity, Vector2::ZERO);
    }

    #[test]
    fn test_collision_hook_is_cosmetic() {
        let mut circle = Entity::circle(1, Vector2::ZERO, 10.0).unwrap();
        circle.on_collision(ShapeKind::Box, true);
        assert_eq!(circle.color, HIT_COLOR);
        assert_eq!(circle.position, Vector2::ZERO);
        assert_eq!(circle.velocity, Vector2::ZERO);

        let mut rect = Entity::rect(2, Vector2::ZERO, 5.0, 5.0).unwrap();
        rect.on_collision(ShapeKind::Circle, true);
        assert!(rect.rotation > 0.0);
        assert_ne!(rect.color, BOX_COLOR);

        // キネマティックの箱は回転しない
        let mut wall = Entity::rect(3, Vector2::ZERO, 5.0, 5.0).unwrap();
        wall.set_kinematic(true);
        wall.on_collision(ShapeKind::Circle, true);
        assert_eq!(wall.rotation, 0.0);
    }

    #[test]
    fn test_resting_contact_leaves_box_unchanged() {
        let mut rect = Entity::rect(1, Vector2::ZERO, 5.0, 5.0).unwrap();
        for _ in 0..60 {
            rect.on_collision(ShapeKind::Box, false);
            rect.on_collision(ShapeKind::Circle, false);
        }
        assert_eq!(rect.rotation, 0.0);
        assert_eq!(rect.color, BOX_COLOR);
    }

    #[test]
    fn test_accessors_cannot_move_kinematic_entity() {
        let mut wall = Entity::rect(7, Vector2::new(3.0, 4.0), 5.0, 5.0).unwrap();
        wall.set_kinematic(true);

        wall.set_velocity(Vector2::new(2.0, 0.0));
        wall.apply_force(Vector2::new(0.0, 9.0));
        wall.update();

        assert_eq!(wall.id(), 7);
        assert_eq!(wall.position(), Vector2::new(3.0, 4.0));
        assert_eq!(wall.velocity(), Vector2::ZERO);
        assert_eq!(wall.force(), Vector2::ZERO);
    }
}
