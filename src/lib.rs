//! 2次元剛体物理サンドボックス
//!
//! 円と箱を生成し、入力に応じた重力のもとで落下・衝突させます。
//! 衝突は衝撃ベースで解決され、固定時間ステップで決定的に進みます。

use wasm_bindgen::prelude::*;

// モジュール宣言
pub mod app;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod simulation;
pub mod utils;

pub use app::Sandbox;
pub use config::SandboxConfig;
pub use error::{ConfigError, Result};
pub use input::{InputSource, InputState, ScriptedInput, TickInput};
pub use physics::{Entity, Material, Shape, ShapeKind};
pub use simulation::{RenderInstance, Simulation};
pub use utils::math::{Matrix4, Vector2};

// 初期化用のエントリーポイント
#[wasm_bindgen(start)]
pub fn start() {
    // エラーをコンソールにパニックフックとして表示
    console_error_panic_hook::set_once();

    // ロガーの初期化
    utils::logger::init_logging(utils::logger::LogLevel::default());
    log::info!("WebAssembly module initialized!");
}
