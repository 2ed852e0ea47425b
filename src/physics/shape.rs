//! 衝突形状モジュール
//!
//! エンティティの種類ごとの幾何データ（円の半径、箱の半幅・半長）と
//! そこから導出される境界情報を提供します。

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::utils::math::Vector2;

/// 形状の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// 円形
    Circle,
    /// 箱（軸並行）
    Box,
}

/// 衝突形状
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// 円形
    Circle {
        /// 半径
        radius: f32,
    },
    /// 箱
    Box {
        /// 半幅（X方向）
        half_width: f32,
        /// 半長（Y方向）
        half_length: f32,
    },
}

/// 軸並行境界ボックス
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector2,
    pub max: Vector2,
}

impl Aabb {
    /// 中心と半サイズから作成
    pub fn from_center(center: Vector2, half_extents: Vector2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// 点をボックス内に制限
    pub fn clamp_point(&self, point: Vector2) -> Vector2 {
        Vector2::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
        )
    }

    /// 別のボックスと重なっているか（接しているだけの場合は重ならない）
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

impl Shape {
    /// 円形を作成
    pub fn circle(radius: f32) -> Result<Self> {
        let shape = Shape::Circle { radius };
        shape.validate()?;
        Ok(shape)
    }

    /// 箱を作成
    pub fn rect(half_width: f32, half_length: f32) -> Result<Self> {
        let shape = Shape::Box { half_width, half_length };
        shape.validate()?;
        Ok(shape)
    }

    /// 形状の種類を取得
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Box { .. } => ShapeKind::Box,
        }
    }

    /// 幾何データが正の有限値かを検証
    pub fn validate(&self) -> Result<()> {
        match *self {
            Shape::Circle { radius } => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(ConfigError::InvalidRadius(radius));
                }
            }
            Shape::Box { half_width, half_length } => {
                let valid = |v: f32| v.is_finite() && v > 0.0;
                if !(valid(half_width) && valid(half_length)) {
                    return Err(ConfigError::InvalidExtents { half_width, half_length });
                }
            }
        }
        Ok(())
    }

    /// 半サイズ（円の場合は半径を両軸に使う）
    pub fn half_extents(&self) -> Vector2 {
        match *self {
            Shape::Circle { radius } => Vector2::new(radius, radius),
            Shape::Box { half_width, half_length } => Vector2::new(half_width, half_length),
        }
    }

    /// 指定位置での境界ボックス
    pub fn bounds(&self, position: Vector2) -> Aabb {
        Aabb::from_center(position, self.half_extents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_validation() {
        assert!(Shape::circle(10.0).is_ok());
        assert!(matches!(Shape::circle(0.0), Err(ConfigError::InvalidRadius(_))));
        assert!(matches!(Shape::circle(f32::NAN), Err(ConfigError::InvalidRadius(_))));

        assert!(Shape::rect(50.0, 10.0).is_ok());
        assert!(matches!(Shape::rect(-1.0, 10.0), Err(ConfigError::InvalidExtents { .. })));
        assert!(matches!(Shape::rect(1.0, f32::INFINITY), Err(ConfigError::InvalidExtents { .. })));
    }

    #[test]
    fn test_bounds() {
        let circle = Shape::Circle { radius: 5.0 };
        let bounds = circle.bounds(Vector2::new(10.0, 20.0));
        assert_eq!(bounds.min, Vector2::new(5.0, 15.0));
        assert_eq!(bounds.max, Vector2::new(15.0, 25.0));

        let rect = Shape::Box { half_width: 4.0, half_length: 2.0 };
        assert_eq!(rect.kind(), ShapeKind::Box);
        assert_eq!(rect.half_extents(), Vector2::new(4.0, 2.0));
    }

    #[test]
    fn test_aabb_queries() {
        let a = Aabb::from_center(Vector2::ZERO, Vector2::new(1.0, 1.0));
        let b = Aabb::from_center(Vector2::new(2.0, 0.0), Vector2::new(1.0, 1.0));
        let c = Aabb::from_center(Vector2::new(1.5, 0.0), Vector2::new(1.0, 1.0));

        // 接しているだけでは重ならない
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));

        assert_eq!(a.clamp_point(Vector2::new(3.0, -0.5)), Vector2::new(1.0, -0.5));
    }
}
