//! シミュレーションモジュール
//!
//! エンティティの集合と物理パラメータを所有し、固定時間ステップでワールドを進めます。
//! 1ティックの処理順は「入力の適用 → 全エンティティの積分 → 全エンティティの衝突判定」です。
//! 衝突判定は総当たり（O(n²)）で、挿入順に行われるため結果は決定的です。

pub mod render;
pub mod scene;

use crate::config::SandboxConfig;
use crate::error::Result;
use crate::input::{InputSource, TickInput};
use crate::physics::collision::detect;
use crate::physics::dynamics::{CollisionResolver, ForceGenerator, Integrator};
use crate::physics::entity::Entity;
use crate::physics::shape::{Shape, ShapeKind};
use crate::physics::step::{FixedTimestep, LoopState};
use crate::utils::math::{Matrix4, Vector2};

pub use render::RenderInstance;
pub use scene::seed_scene;

/// シミュレーション
///
/// エンティティはこの構造体が排他的に所有し、破棄されるまで削除されません。
#[derive(Debug, Clone)]
pub struct Simulation {
    /// 設定
    config: SandboxConfig,
    /// エンティティ（挿入順）
    entities: Vec<Entity>,
    /// 次に割り当てるエンティティID
    next_id: u32,
    /// 積分器
    integrator: Integrator,
    /// 衝突解決器
    resolver: CollisionResolver,
    /// 入力による力の生成器
    forces: ForceGenerator,
    /// 固定時間ステップ制御
    timestep: FixedTimestep,
    /// 実行済みのティック数
    tick_count: u64,
}

impl Simulation {
    /// 空のシミュレーションを作成
    ///
    /// # 引数
    ///
    /// * `config` - サンドボックス設定（作成時に検証される）
    ///
    /// # 戻り値
    ///
    /// * 設定が不正な場合は`ConfigError`
    pub fn new(config: SandboxConfig) -> Result<Self> {
        config.validate()?;

        let physics = &config.physics;
        let integrator = Integrator::with_max_speed(physics.max_speed);
        let resolver = CollisionResolver::with_params(
            physics.correction_rate,
            physics.penetration_slop,
            physics.resting_speed,
        );
        let forces = ForceGenerator::new(physics.gravity, physics.move_force);
        let timestep = FixedTimestep::new(f64::from(physics.ticks_per_second), physics.max_ticks_per_frame);

        log::info!(
            "simulation created: world {}x{}, {} ticks/s",
            config.world.width,
            config.world.height,
            physics.ticks_per_second
        );

        Ok(Self {
            config,
            entities: Vec::new(),
            next_id: 0,
            integrator,
            resolver,
            forces,
            timestep,
            tick_count: 0,
        })
    }

    /// 初期シーンを配置したシミュレーションを作成
    pub fn with_scene(config: SandboxConfig) -> Result<Self> {
        let mut simulation = Self::new(config)?;
        seed_scene(&mut simulation)?;
        Ok(simulation)
    }

    /// 設定済みの既定値でエンティティを生成
    ///
    /// # 戻り値
    ///
    /// 生成されたエンティティのID
    pub fn spawn(&mut self, shape: Shape, position: Vector2, kinematic: bool) -> Result<u32> {
        let spawn = &self.config.spawn;
        let entity = Entity::new(self.next_id, shape, position, spawn.mass, spawn.material)?;
        let id = self.add_entity(entity);
        if kinematic {
            if let Some(entity) = self.entities.last_mut() {
                entity.set_kinematic(true);
            }
        }
        log::debug!("spawned {:?} #{} at ({}, {}), kinematic: {}", shape.kind(), id, position.x, position.y, kinematic);
        Ok(id)
    }

    /// 円を生成
    pub fn spawn_circle(&mut self, position: Vector2, kinematic: bool) -> Result<u32> {
        self.spawn(self.config.spawn.circle_shape(), position, kinematic)
    }

    /// 箱を生成
    pub fn spawn_box(&mut self, position: Vector2, kinematic: bool) -> Result<u32> {
        self.spawn(self.config.spawn.box_shape(), position, kinematic)
    }

    /// 構築済みのエンティティを追加（IDは振り直される）
    pub fn add_entity(&mut self, mut entity: Entity) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    /// 1ティック分の入力を適用
    ///
    /// クリックによる生成、移動入力による力、箱の回転、終了要求を処理します。
    pub fn apply_input(&mut self, input: &TickInput) {
        if input.quit {
            self.shutdown();
            return;
        }

        let clicks = [(input.primary_click, false), (input.secondary_click, true)];
        for (position, kinematic) in clicks {
            let Some(position) = position else { continue };
            let result = if input.spawn_box {
                self.spawn_box(position, kinematic)
            } else {
                self.spawn_circle(position, kinematic)
            };
            if let Err(error) = result {
                log::warn!("spawn at ({}, {}) rejected: {}", position.x, position.y, error);
            }
        }

        let rotation = input.rotation * self.config.physics.rotation_step;
        for entity in &mut self.entities {
            if input.movement != Vector2::ZERO {
                self.forces.apply_movement(entity, input.movement);
            }
            if rotation != 0.0 && entity.kind() == ShapeKind::Box {
                entity.rotate(rotation);
            }
        }
    }

    /// ちょうど1ティック進める
    ///
    /// # 戻り値
    ///
    /// ティックが実行された場合はtrue（終了済み、または終了要求を受けた場合はfalse）
    pub fn tick(&mut self, input: &TickInput) -> bool {
        if self.timestep.is_terminated() {
            return false;
        }

        self.apply_input(input);
        if self.timestep.is_terminated() {
            return false;
        }

        for entity in &mut self.entities {
            self.integrator.integrate(entity);
        }

        for index in 0..self.entities.len() {
            self.check_collisions(index);
        }

        self.tick_count += 1;
        true
    }

    /// 経過時間を累積し、たまった分のティックを実行
    ///
    /// # 引数
    ///
    /// * `elapsed_secs` - 前回の呼び出しからの経過時間（秒）
    /// * `input` - ティックごとに1回だけ取り出される入力
    ///
    /// # 戻り値
    ///
    /// 実行したティック数
    pub fn advance<I: InputSource + ?Sized>(&mut self, elapsed_secs: f64, input: &mut I) -> usize {
        self.timestep.accumulate(elapsed_secs);

        let mut ticks = 0;
        while self.timestep.begin_tick() {
            let tick_input = input.sample();
            if !self.tick(&tick_input) {
                break;
            }
            ticks += 1;
        }

        ticks
    }

    /// 指定したエンティティと他のすべてのエンティティの衝突を判定し、解決する
    ///
    /// # 戻り値
    ///
    /// 解決した衝突の数
    pub fn check_collisions(&mut self, index: usize) -> usize {
        if index >= self.entities.len() {
            return 0;
        }

        let mut resolved = 0;
        for other in 0..self.entities.len() {
            if other == index {
                continue;
            }

            let Some(contact) = detect(&self.entities[index], &self.entities[other]) else {
                continue;
            };

            let (entity_a, entity_b) = pair_mut(&mut self.entities, index, other);
            if self.resolver.resolve(entity_a, entity_b, &contact) {
                resolved += 1;
            }
        }

        resolved
    }

    /// シミュレーションを終了
    pub fn shutdown(&mut self) {
        if !self.timestep.is_terminated() {
            log::info!("simulation terminated after {} ticks", self.tick_count);
        }
        self.timestep.shutdown();
    }

    /// 実行中かどうか
    pub fn is_running(&self) -> bool {
        !self.timestep.is_terminated()
    }

    /// ループの状態
    pub fn state(&self) -> LoopState {
        self.timestep.state()
    }

    /// 描画の補間係数
    pub fn alpha(&self) -> f64 {
        self.timestep.alpha()
    }

    /// 全エンティティ（挿入順）
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// IDでエンティティを取得
    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    /// IDでエンティティを可変で取得
    pub fn entity_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    /// 実行済みのティック数
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// 設定
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// ワールド全体を映す正射影行列
    pub fn projection(&self) -> Matrix4 {
        let world = &self.config.world;
        Matrix4::orthographic(0.0, world.width as f32, 0.0, world.height as f32, 0.0, 1.0)
    }
}

/// スライスから異なる2要素を同時に可変で借用
fn pair_mut(entities: &mut [Entity], a: usize, b: usize) -> (&mut Entity, &mut Entity) {
    if a < b {
        let (left, right) = entities.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = entities.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::input::ScriptedInput;

    fn empty() -> Simulation {
        Simulation::new(SandboxConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SandboxConfig::default();
        config.spawn.mass = 0.0;
        assert!(matches!(Simulation::new(config), Err(ConfigError::NonPositiveMass(_))));
    }

    #[test]
    fn test_spawn_assigns_sequential_ids() {
        let mut simulation = empty();
        let a = simulation.spawn_circle(Vector2::new(10.0, 10.0), false).unwrap();
        let b = simulation.spawn_box(Vector2::new(100.0, 10.0), true).unwrap();

        assert_eq!((a, b), (0, 1));
        assert_eq!(simulation.entities().len(), 2);
        assert!(simulation.entity(b).unwrap().is_kinematic());
        assert_eq!(simulation.entity(b).unwrap().kind(), ShapeKind::Box);
    }

    #[test]
    fn test_clicks_spawn_entities() {
        let mut simulation = empty();
        simulation.tick(&TickInput {
            primary_click: Some(Vector2::new(100.0, 300.0)),
            secondary_click: Some(Vector2::new(400.0, 300.0)),
            ..TickInput::default()
        });
        simulation.tick(&TickInput {
            primary_click: Some(Vector2::new(700.0, 300.0)),
            spawn_box: true,
            ..TickInput::default()
        });

        let entities = simulation.entities();
        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0].kind(), ShapeKind::Circle);
        assert!(!entities[0].is_kinematic());
        assert!(entities[1].is_kinematic());
        assert_eq!(entities[2].kind(), ShapeKind::Box);
    }

    #[test]
    fn test_movement_input_applies_force() {
        let mut simulation = empty();
        let id = simulation.spawn_circle(Vector2::new(400.0, 300.0), false).unwrap();
        let wall = simulation.spawn_circle(Vector2::new(100.0, 100.0), true).unwrap();

        simulation.apply_input(&TickInput::with_movement(0.0, 1.0));
        // force.y = 1 * 5 * -0.1 * 1
        assert!((simulation.entity(id).unwrap().force.y + 0.5).abs() < 1e-6);
        assert_eq!(simulation.entity(wall).unwrap().force, Vector2::ZERO);

        simulation.tick(&TickInput::idle());
        assert!(simulation.entity(id).unwrap().position.y < 300.0);
    }

    #[test]
    fn test_rotation_input_only_rotates_boxes() {
        let mut simulation = empty();
        let circle = simulation.spawn_circle(Vector2::new(100.0, 300.0), false).unwrap();
        let rect = simulation.spawn_box(Vector2::new(400.0, 300.0), true).unwrap();

        let input = TickInput {
            rotation: 1.0,
            ..TickInput::default()
        };
        simulation.tick(&input);

        let step = simulation.config().physics.rotation_step;
        assert_eq!(simulation.entity(circle).unwrap().rotation, 0.0);
        assert!((simulation.entity(rect).unwrap().rotation - step).abs() < 1e-6);
    }

    #[test]
    fn test_check_collisions_separates_pair() {
        let mut simulation = empty();
        simulation.spawn_circle(Vector2::new(100.0, 100.0), false).unwrap();
        simulation.spawn_circle(Vector2::new(110.0, 100.0), false).unwrap();

        assert_eq!(simulation.check_collisions(0), 1);
        let entities = simulation.entities();
        let distance = (entities[1].position - entities[0].position).length();
        assert!(distance >= 20.0 - simulation.config().physics.penetration_slop - 1e-4);

        // 範囲外のインデックスは無視
        assert_eq!(simulation.check_collisions(10), 0);
    }

    #[test]
    fn test_advance_runs_whole_ticks() {
        let mut simulation = empty();
        let mut input = ScriptedInput::default();

        assert_eq!(simulation.advance(0.5, &mut input), 30);
        assert_eq!(simulation.tick_count(), 30);
        assert_eq!(simulation.state(), LoopState::Accumulating);
    }

    #[test]
    fn test_quit_terminates() {
        let mut simulation = empty();
        let mut input = ScriptedInput::new(vec![
            TickInput::idle(),
            TickInput {
                quit: true,
                ..TickInput::default()
            },
        ]);

        assert_eq!(simulation.advance(1.0, &mut input), 1);
        assert!(!simulation.is_running());
        assert_eq!(simulation.state(), LoopState::Terminated);

        // 終了後は何も起きない
        assert_eq!(simulation.advance(1.0, &mut input), 0);
        assert!(!simulation.tick(&TickInput::idle()));
    }

    #[test]
    fn test_projection_maps_world_corners() {
        let simulation = empty();
        let projection = simulation.projection();
        let corner = projection.transform_point(Vector2::new(800.0, 600.0));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }
}
