//! 入力処理システムの実装
//!
//! このモジュールは、キーボードとマウスの生のイベントを1ティックごとの入力スナップショット
//! （`TickInput`）に変換します。シミュレーションは`InputSource`トレイトを通して
//! ティックごとに1回だけ入力を取り出します。

use std::collections::{HashSet, VecDeque};

use crate::utils::math::Vector2;

pub mod key_codes;

pub use key_codes::*;

/// 1ティック分の入力
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// 左クリックされたワールド座標（非キネマティックの生成）
    pub primary_click: Option<Vector2>,
    /// 右クリックされたワールド座標（キネマティックの生成）
    pub secondary_click: Option<Vector2>,
    /// クリックで箱を生成するかどうか
    pub spawn_box: bool,
    /// 移動入力（各軸 -1, 0, 1）
    pub movement: Vector2,
    /// 回転入力（-1, 0, 1）
    pub rotation: f32,
    /// 終了要求
    pub quit: bool,
}

impl TickInput {
    /// 何も入力がない状態
    pub fn idle() -> Self {
        Self::default()
    }

    /// 移動入力のみの状態
    pub fn with_movement(x: f32, y: f32) -> Self {
        Self {
            movement: Vector2::new(x, y),
            ..Self::default()
        }
    }
}

/// ティックごとの入力の供給元
pub trait InputSource {
    /// 次のティックの入力を取り出す
    fn sample(&mut self) -> TickInput;
}

/// 記録済みの入力列（テストやリプレイ用）
///
/// 入力を使い切った後は何も入力がない状態を返し続けます。
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    inputs: VecDeque<TickInput>,
}

impl ScriptedInput {
    /// 入力列から作成
    pub fn new(inputs: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
        }
    }

    /// 同じ入力を指定回数繰り返す入力列を作成
    pub fn repeat(input: TickInput, ticks: usize) -> Self {
        Self::new(std::iter::repeat(input).take(ticks))
    }

    /// 残りの入力数
    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> TickInput {
        self.inputs.pop_front().unwrap_or_default()
    }
}

impl InputSource for TickInput {
    fn sample(&mut self) -> TickInput {
        self.clone()
    }
}

/// 入力状態を管理する構造体
#[derive(Debug, Clone)]
pub struct InputState {
    /// キーの現在の状態（押されているかどうか）
    keys_pressed: HashSet<KeyCode>,
    /// 前回のティックでのキーの状態
    keys_previous: HashSet<KeyCode>,
    /// マウスボタンの現在の状態
    mouse_buttons: HashSet<MouseButton>,
    /// マウスの現在位置（スクリーン座標）
    mouse_position: (f32, f32),
    /// 次のティックで処理するクリック（ボタン, ワールド座標）
    pending_clicks: Vec<(MouseButton, Vector2)>,
    /// 画面の高さ（Y座標の反転に使う）
    screen_height: f32,
}

impl InputState {
    /// 新しい入力状態を作成
    pub fn new(screen_height: f32) -> Self {
        Self {
            keys_pressed: HashSet::new(),
            keys_previous: HashSet::new(),
            mouse_buttons: HashSet::new(),
            mouse_position: (0.0, 0.0),
            pending_clicks: Vec::new(),
            screen_height,
        }
    }

    /// キーの状態を更新
    pub fn handle_key(&mut self, key_code: KeyCode, is_pressed: bool) {
        if is_pressed {
            self.keys_pressed.insert(key_code);
        } else {
            self.keys_pressed.remove(&key_code);
        }
    }

    /// マウス位置を更新（スクリーン座標）
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.mouse_position = (x, y);
        }
    }

    /// マウスボタンの状態を更新
    ///
    /// 押された瞬間だけクリックとして記録されます（押し続けても1回のみ）。
    pub fn handle_mouse_button(&mut self, button: MouseButton, is_pressed: bool) {
        if is_pressed {
            if self.mouse_buttons.insert(button) {
                let position = self.to_world(self.mouse_position);
                self.pending_clicks.push((button, position));
            }
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    /// スクリーン座標をワールド座標に変換（Y軸を反転）
    fn to_world(&self, (x, y): (f32, f32)) -> Vector2 {
        Vector2::new(x, self.screen_height - y)
    }

    /// キーが押されているかチェック
    pub fn is_key_pressed(&self, key_code: KeyCode) -> bool {
        self.keys_pressed.contains(&key_code)
    }

    /// キーが前回のティックから押されたかチェック
    pub fn is_key_just_pressed(&self, key_code: KeyCode) -> bool {
        self.keys_pressed.contains(&key_code) && !self.keys_previous.contains(&key_code)
    }

    /// 軸入力を計算（正方向のキーが優先）
    fn axis(&self, positive: KeyCode, negative: KeyCode) -> f32 {
        if self.is_key_pressed(positive) {
            1.0
        } else if self.is_key_pressed(negative) {
            -1.0
        } else {
            0.0
        }
    }
}

impl InputSource for InputState {
    fn sample(&mut self) -> TickInput {
        let mut input = TickInput {
            spawn_box: self.is_key_pressed(KEY_SHIFT),
            movement: Vector2::new(-self.axis(KEY_A, KEY_D), self.axis(KEY_W, KEY_S)),
            rotation: self.axis(KEY_RIGHT, KEY_LEFT),
            quit: self.is_key_just_pressed(KEY_ESCAPE),
            ..TickInput::default()
        };

        // 1ティックにつき各ボタン1回分のクリックを処理する
        for (button, position) in self.pending_clicks.drain(..) {
            match button {
                MOUSE_LEFT if input.primary_click.is_none() => input.primary_click = Some(position),
                MOUSE_RIGHT if input.secondary_click.is_none() => input.secondary_click = Some(position),
                _ => {}
            }
        }

        // 前回の状態を更新
        self.keys_previous = self.keys_pressed.clone();

        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_state_creation() {
        let mut state = InputState::new(600.0);
        assert!(!state.is_key_pressed(KEY_W));
        assert_eq!(state.sample(), TickInput::idle());
    }

    #[test]
    fn test_movement_keys() {
        let mut state = InputState::new(600.0);
        state.handle_key(KEY_W, true);
        state.handle_key(KEY_D, true);

        let input = state.sample();
        assert_eq!(input.movement, Vector2::new(1.0, 1.0));

        // WとSが同時に押された場合はWが優先
        state.handle_key(KEY_S, true);
        assert_eq!(state.sample().movement.y, 1.0);

        // AとDが同時に押された場合はAが優先
        state.handle_key(KEY_A, true);
        assert_eq!(state.sample().movement.x, -1.0);

        state.handle_key(KEY_W, false);
        state.handle_key(KEY_A, false);
        assert_eq!(state.sample().movement, Vector2::new(1.0, -1.0));
    }

    #[test]
    fn test_rotation_and_modifiers() {
        let mut state = InputState::new(600.0);
        state.handle_key(KEY_LEFT, true);
        state.handle_key(KEY_SHIFT, true);

        let input = state.sample();
        assert_eq!(input.rotation, -1.0);
        assert!(input.spawn_box);
    }

    #[test]
    fn test_clicks_are_edge_triggered() {
        let mut state = InputState::new(600.0);
        state.handle_mouse_move(100.0, 50.0);
        state.handle_mouse_button(MOUSE_LEFT, true);

        let input = state.sample();
        // Y座標は反転される
        assert_eq!(input.primary_click, Some(Vector2::new(100.0, 550.0)));
        assert_eq!(input.secondary_click, None);

        // 押し続けても次のティックではクリックにならない
        state.handle_mouse_button(MOUSE_LEFT, true);
        assert_eq!(state.sample().primary_click, None);

        // 離して押し直すと再びクリックになる
        state.handle_mouse_button(MOUSE_LEFT, false);
        state.handle_mouse_move(10.0, 600.0);
        state.handle_mouse_button(MOUSE_RIGHT, true);
        state.handle_mouse_button(MOUSE_LEFT, true);
        let input = state.sample();
        assert_eq!(input.primary_click, Some(Vector2::new(10.0, 0.0)));
        assert_eq!(input.secondary_click, Some(Vector2::new(10.0, 0.0)));
    }

    #[test]
    fn test_escape_requests_quit_once() {
        let mut state = InputState::new(600.0);
        state.handle_key(KEY_ESCAPE, true);
        assert!(state.sample().quit);
        assert!(!state.sample().quit);
    }

    #[test]
    fn test_scripted_input() {
        let mut script = ScriptedInput::new(vec![TickInput::with_movement(0.0, 1.0), TickInput::idle()]);
        assert_eq!(script.remaining(), 2);
        assert_eq!(script.sample().movement, Vector2::new(0.0, 1.0));
        assert_eq!(script.sample(), TickInput::idle());
        // 使い切った後は入力なし
        assert_eq!(script.sample(), TickInput::idle());

        let mut repeated = ScriptedInput::repeat(TickInput::with_movement(1.0, 0.0), 3);
        assert_eq!(repeated.remaining(), 3);
        repeated.sample();
        assert_eq!(repeated.remaining(), 2);
    }
}
