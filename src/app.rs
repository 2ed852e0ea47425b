//! JavaScript向けのサンドボックスインスタンス
//!
//! ブラウザ側のイベントを入力状態に流し込み、`requestAnimationFrame`ごとに
//! `update`を呼ぶことでシミュレーションを進めます。描画はJS側が
//! `snapshot_json`と`projection`を読み取って行います。

use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::config::SandboxConfig;
use crate::input::{InputState, MouseButton};
use crate::simulation::Simulation;
use crate::utils::logger::init_logging;

/// 1フレームで処理する経過時間の上限（秒）
const MAX_FRAME_SECS: f64 = 0.25;

/// JavaScriptからアクセス可能なサンドボックスインスタンス
#[wasm_bindgen]
pub struct Sandbox {
    simulation: Simulation,
    input: InputState,
    last_update_time: f64,
}

#[wasm_bindgen]
impl Sandbox {
    /// 新しいサンドボックスを作成
    ///
    /// # 引数
    ///
    /// * `config_json` - 設定のJSON（空文字列なら既定値）
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<Sandbox, JsValue> {
        console::log_1(&"Creating new sandbox instance".into());

        let config = if config_json.trim().is_empty() {
            SandboxConfig::default()
        } else {
            SandboxConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        init_logging(config.log_level);

        let input = InputState::new(config.world.height as f32);
        let simulation = Simulation::with_scene(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Sandbox {
            simulation,
            input,
            last_update_time: js_sys::Date::now(),
        })
    }

    /// キーイベントを処理
    pub fn handle_key_event(&mut self, key_code: u32, pressed: bool) {
        self.input.handle_key(key_code, pressed);
    }

    /// マウスイベントを処理
    ///
    /// # 引数
    ///
    /// * `event_type` - "mousedown", "mouseup", "mousemove"のいずれか
    /// * `x`, `y` - キャンバス上の座標（左上原点）
    /// * `button` - 押されたボタン（0: 左, 1: 中, 2: 右）
    pub fn handle_mouse_event(&mut self, event_type: &str, x: f32, y: f32, button: Option<i32>) {
        self.input.handle_mouse_move(x, y);

        let button = button.and_then(|b| MouseButton::try_from(b).ok());
        match (event_type, button) {
            ("mousedown", Some(button)) => self.input.handle_mouse_button(button, true),
            ("mouseup", Some(button)) => self.input.handle_mouse_button(button, false),
            ("mousemove", _) => {}
            (other, _) => log::debug!("ignoring mouse event {}", other),
        }
    }

    /// 経過時間に応じてシミュレーションを進める
    ///
    /// # 戻り値
    ///
    /// 実行したティック数
    pub fn update(&mut self) -> u32 {
        let current_time = js_sys::Date::now();
        let mut elapsed = (current_time - self.last_update_time) / 1000.0;
        self.last_update_time = current_time;

        // タブが非表示だった場合などの極端な値を抑える
        if !elapsed.is_finite() || elapsed < 0.0 {
            elapsed = 0.0;
        }
        elapsed = elapsed.min(MAX_FRAME_SECS);

        let ticks = self.simulation.advance(elapsed, &mut self.input);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    /// 描画スナップショットをJSONで取得
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.simulation.render_snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// 正射影行列（列優先の16要素）
    pub fn projection(&self) -> Vec<f32> {
        self.simulation.projection().as_array().to_vec()
    }

    /// 描画の補間係数
    pub fn alpha(&self) -> f64 {
        self.simulation.alpha()
    }

    /// エンティティ数
    pub fn entity_count(&self) -> usize {
        self.simulation.entities().len()
    }

    /// 実行中かどうか
    pub fn is_running(&self) -> bool {
        self.simulation.is_running()
    }

    /// 解放時の処理
    pub fn dispose(&mut self) {
        self.simulation.shutdown();
    }
}
