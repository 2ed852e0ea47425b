//! 描画用スナップショット
//!
//! 描画層に渡す読み取り専用の変換情報です。メッシュの分割や描画そのものはJS側が担当します。

use serde::Serialize;

use crate::physics::shape::{Shape, ShapeKind};
use crate::simulation::Simulation;
use crate::utils::math::Vector2;

/// 1エンティティ分の描画情報
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderInstance {
    /// エンティティID
    pub id: u32,
    /// 形状の種類
    pub kind: ShapeKind,
    /// 中心位置
    pub position: Vector2,
    /// 回転角（ラジアン）
    pub rotation: f32,
    /// 描画色（RGB）
    pub color: [f32; 3],
    /// 描画サイズ（円は直径、箱は半幅・半長）
    pub extents: Vector2,
}

impl Simulation {
    /// 現在の状態の描画スナップショットを作成
    pub fn render_snapshot(&self) -> Vec<RenderInstance> {
        self.entities()
            .iter()
            .map(|entity| {
                let extents = match *entity.shape() {
                    Shape::Circle { radius } => Vector2::new(radius * 2.0, radius * 2.0),
                    Shape::Box { half_width, half_length } => Vector2::new(half_width, half_length),
                };
                RenderInstance {
                    id: entity.id,
                    kind: entity.kind(),
                    position: entity.position,
                    rotation: entity.rotation,
                    color: entity.color,
                    extents,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SandboxConfig;

    #[test]
    fn test_render_snapshot() {
        let mut simulation = Simulation::new(SandboxConfig::default()).unwrap();
        simulation.spawn_circle(Vector2::new(10.0, 20.0), false).unwrap();
        simulation.spawn_box(Vector2::new(300.0, 40.0), true).unwrap();

        let snapshot = simulation.render_snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].kind, ShapeKind::Circle);
        assert_eq!(snapshot[0].extents, Vector2::new(20.0, 20.0));
        assert_eq!(snapshot[1].extents, Vector2::new(50.0, 10.0));
        assert_eq!(snapshot[1].position, Vector2::new(300.0, 40.0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut simulation = Simulation::new(SandboxConfig::default()).unwrap();
        simulation.spawn_circle(Vector2::new(10.0, 20.0), false).unwrap();

        let json = serde_json::to_string(&simulation.render_snapshot()).unwrap();
        assert!(json.contains("\"kind\":\"Circle\""));
        assert!(json.contains("\"position\":{\"x\":10.0,\"y\":20.0}"));
    }
}
