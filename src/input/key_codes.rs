//! キーコードの定数定義
//!
//! このモジュールはサンドボックスの操作に使うキーボードキーとマウスボタンの定数を定義します。
//! 値はブラウザの`KeyboardEvent.keyCode`と`MouseEvent.button`に対応しています。

/// キーコード用の型エイリアス
pub type KeyCode = u32;

/// マウスボタン用の型エイリアス
pub type MouseButton = u8;

/// マウス左ボタン（円・箱の生成）
pub const MOUSE_LEFT: MouseButton = 0;
/// マウス右ボタン（静的なエンティティの生成）
pub const MOUSE_RIGHT: MouseButton = 2;

/// キーボード: A（左へ移動）
pub const KEY_A: KeyCode = 65;
/// キーボード: D（右へ移動）
pub const KEY_D: KeyCode = 68;
/// キーボード: S（上へ移動）
pub const KEY_S: KeyCode = 83;
/// キーボード: W（下へ移動）
pub const KEY_W: KeyCode = 87;

/// キーボード: 左矢印（左回転）
pub const KEY_LEFT: KeyCode = 37;
/// キーボード: 右矢印（右回転）
pub const KEY_RIGHT: KeyCode = 39;

/// キーボード: Shift（クリックで箱を生成）
pub const KEY_SHIFT: KeyCode = 16;
/// キーボード: Escape（終了）
pub const KEY_ESCAPE: KeyCode = 27;
