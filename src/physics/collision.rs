//! 衝突検出モジュール
//!
//! このモジュールは、形状の組み合わせごとの衝突検出アルゴリズムを提供します。
//! 円と円、円と箱、箱と箱（いずれも軸並行、回転は無視）をサポートしています。
//! 総当たりで呼び出されるため計算量はO(n²)で、空間分割は行いません。

use crate::physics::entity::Entity;
use crate::physics::shape::{Aabb, Shape};
use crate::utils::math::Vector2;

/// 法線が求められない場合に使う既定の法線
pub const DEFAULT_NORMAL: Vector2 = Vector2::UP;

/// 接触情報
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// 衝突の法線ベクトル（常にAからBへ向く単位ベクトル）
    pub normal: Vector2,
    /// 貫通深度
    pub penetration: f32,
}

impl Contact {
    /// AとBを入れ替えた接触情報
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            penetration: self.penetration,
        }
    }
}

/// 二つのエンティティ間の衝突を検出
pub fn detect(entity_a: &Entity, entity_b: &Entity) -> Option<Contact> {
    match (entity_a.shape(), entity_b.shape()) {
        (Shape::Circle { radius: radius_a }, Shape::Circle { radius: radius_b }) => {
            detect_circle_circle(entity_a.position, *radius_a, entity_b.position, *radius_b)
        }
        (Shape::Circle { radius }, Shape::Box { .. }) => {
            detect_circle_box(entity_a.position, *radius, &entity_b.bounds())
        }
        (Shape::Box { .. }, Shape::Circle { radius }) => {
            // 円と箱の衝突検出を反転
            detect_circle_box(entity_b.position, *radius, &entity_a.bounds()).map(Contact::flipped)
        }
        (Shape::Box { .. }, Shape::Box { .. }) => detect_box_box(&entity_a.bounds(), &entity_b.bounds()),
    }
}

/// 円と円の衝突検出
///
/// 中心間距離が半径の合計と等しい場合は衝突とみなさない。
fn detect_circle_circle(
    position_a: Vector2,
    radius_a: f32,
    position_b: Vector2,
    radius_b: f32,
) -> Option<Contact> {
    let delta = position_b - position_a;
    let distance_squared = delta.length_squared();
    let radius_sum = radius_a + radius_b;

    if distance_squared >= radius_sum * radius_sum {
        return None;
    }

    let distance = distance_squared.sqrt();

    // 完全重なりの場合は上向きの法線を返す
    let normal = delta.try_normalize().unwrap_or(DEFAULT_NORMAL);

    Some(Contact {
        normal,
        penetration: radius_sum - distance,
    })
}

/// 円と箱の衝突検出
///
/// 返す法線は円（A）から箱（B）へ向く。
fn detect_circle_box(circle_pos: Vector2, radius: f32, aabb: &Aabb) -> Option<Contact> {
    let closest = aabb.clamp_point(circle_pos);

    // 最近点から円の中心へのベクトル
    let delta = circle_pos - closest;
    let distance_squared = delta.length_squared();

    if distance_squared >= radius * radius {
        return None;
    }

    if let Some(outward) = delta.try_normalize() {
        // 円の中心が箱の外側
        return Some(Contact {
            normal: -outward,
            penetration: radius - distance_squared.sqrt(),
        });
    }

    // 円の中心が箱の内部（または境界上）: 最も近い辺から押し出す
    let d_left = circle_pos.x - aabb.min.x;
    let d_right = aabb.max.x - circle_pos.x;
    let d_bottom = circle_pos.y - aabb.min.y;
    let d_top = aabb.max.y - circle_pos.y;
    let min_dist = d_left.min(d_right).min(d_bottom).min(d_top);

    let outward = if min_dist == d_top {
        Vector2::new(0.0, 1.0)
    } else if min_dist == d_bottom {
        Vector2::new(0.0, -1.0)
    } else if min_dist == d_left {
        Vector2::new(-1.0, 0.0)
    } else {
        Vector2::new(1.0, 0.0)
    };

    Some(Contact {
        normal: -outward,
        penetration: radius + min_dist,
    })
}

/// 箱と箱の衝突検出
///
/// 貫通が最小の軸を法線とし、AからBへ向ける。
fn detect_box_box(a: &Aabb, b: &Aabb) -> Option<Contact> {
    if !a.overlaps(b) {
        return None;
    }

    let overlap_x = a.max.x.min(b.max.x) - a.min.x.max(b.min.x);
    let overlap_y = a.max.y.min(b.max.y) - a.min.y.max(b.min.y);

    let center_a = (a.min + a.max) * 0.5;
    let center_b = (b.min + b.max) * 0.5;

    if overlap_x < overlap_y {
        let sign = if center_a.x <= center_b.x { 1.0 } else { -1.0 };
        Some(Contact {
            normal: Vector2::new(sign, 0.0),
            penetration: overlap_x,
        })
    } else {
        // 同じ場合は縦方向を優先（積み重ねを安定させる）
        let sign = if center_a.y <= center_b.y { 1.0 } else { -1.0 };
        Some(Contact {
            normal: Vector2::new(0.0, sign),
            penetration: overlap_y,
        })
    }
}
