//! 数学ユーティリティモジュール
//!
//! このモジュールには、物理演算と描画で使用される2次元ベクトルと
//! 正射影行列などの数学プリミティブが含まれています。

use std::f32::consts::{PI, TAU};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// 正規化を行う最小の長さ（これ未満はゼロベクトル扱い）
pub const NORMALIZE_EPSILON: f32 = 1.0e-4;

/// 2次元ベクトル
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    /// ゼロベクトル
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };
    /// 上向きの単位ベクトル
    pub const UP: Vector2 = Vector2 { x: 0.0, y: 1.0 };

    /// 新しいベクトルを作成
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// 内積
    pub fn dot(self, other: Vector2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// ベクトルの長さの二乗（距離の比較用）
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// ベクトルの長さ
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// スカラー倍
    pub fn scale(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// 正規化されたベクトルを取得
    ///
    /// # 戻り値
    ///
    /// * 長さが1のベクトル。長さがほぼゼロの場合はゼロベクトル
    pub fn normalize(self) -> Self {
        self.try_normalize().unwrap_or(Self::ZERO)
    }

    /// 正規化できる場合のみ単位ベクトルを返す
    pub fn try_normalize(self) -> Option<Self> {
        let length = self.length();
        if length > NORMALIZE_EPSILON && length.is_finite() {
            Some(self.scale(1.0 / length))
        } else {
            None
        }
    }

    /// 両成分が有限値かどうか
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// 4x4行列（列優先、GLへそのまま転送できる並び）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    values: [f32; 16],
}

impl Matrix4 {
    /// 単位行列
    pub fn identity() -> Self {
        let mut values = [0.0; 16];
        values[0] = 1.0;
        values[5] = 1.0;
        values[10] = 1.0;
        values[15] = 1.0;
        Self { values }
    }

    /// 正射影行列を作成
    ///
    /// # 引数
    ///
    /// * `left`, `right` - X方向のクリップ面
    /// * `bottom`, `top` - Y方向のクリップ面
    /// * `near`, `far` - Z方向のクリップ面
    ///
    /// # 戻り値
    ///
    /// * 指定した直方体を[-1, 1]の立方体に写す行列
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let mut matrix = Self::identity();
        let width = right - left;
        let height = top - bottom;
        let depth = far - near;

        matrix.set(0, 0, 2.0 / width);
        matrix.set(1, 1, 2.0 / height);
        matrix.set(2, 2, -2.0 / depth);
        matrix.set(0, 3, -(right + left) / width);
        matrix.set(1, 3, -(top + bottom) / height);
        matrix.set(2, 3, -(far + near) / depth);
        matrix
    }

    /// 要素を取得（行, 列）
    pub fn get(&self, row: usize, column: usize) -> f32 {
        self.values[column * 4 + row]
    }

    fn set(&mut self, row: usize, column: usize, value: f32) {
        self.values[column * 4 + row] = value;
    }

    /// 点を変換（z = 0, w = 1）
    pub fn transform_point(&self, point: Vector2) -> Vector2 {
        Vector2::new(
            self.get(0, 0) * point.x + self.get(0, 1) * point.y + self.get(0, 3),
            self.get(1, 0) * point.x + self.get(1, 1) * point.y + self.get(1, 3),
        )
    }

    /// 列優先の配列として取得
    pub fn as_array(&self) -> &[f32; 16] {
        &self.values
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::identity()
    }
}

/// 度数法からラジアンに変換
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

/// 角度を0〜2πの範囲に正規化
///
/// # 引数
///
/// * `angle` - 正規化する角度（ラジアン）
///
/// # 戻り値
///
/// * 0〜2πの範囲に正規化された角度
pub fn normalize_angle(angle: f32) -> f32 {
    let mut result = angle % TAU;
    if result < 0.0 {
        result += TAU;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_operations() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(1.0, -2.0);

        assert_eq!(a + b, Vector2::new(4.0, 2.0));
        assert_eq!(a - b, Vector2::new(2.0, 6.0));
        assert_eq!(a * 2.0, Vector2::new(6.0, 8.0));
        assert_eq!(-b, Vector2::new(-1.0, 2.0));
        assert_eq!(a.dot(b), -5.0);
        assert_eq!(a.length(), 5.0);
    }

    #[test]
    fn test_normalize() {
        let n = Vector2::new(0.0, 10.0).normalize();
        assert_eq!(n, Vector2::UP);

        // ゼロベクトルは正規化できない
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
        assert!(Vector2::new(1.0e-6, 0.0).try_normalize().is_none());
        assert!(Vector2::new(f32::NAN, 1.0).try_normalize().is_none());
    }

    #[test]
    fn test_orthographic_maps_screen_corners() {
        let projection = Matrix4::orthographic(0.0, 800.0, 0.0, 600.0, 0.0, 1.0);

        let bottom_left = projection.transform_point(Vector2::new(0.0, 0.0));
        let top_right = projection.transform_point(Vector2::new(800.0, 600.0));
        let center = projection.transform_point(Vector2::new(400.0, 300.0));

        assert!((bottom_left.x + 1.0).abs() < 1e-6);
        assert!((bottom_left.y + 1.0).abs() < 1e-6);
        assert!((top_right.x - 1.0).abs() < 1e-6);
        assert!((top_right.y - 1.0).abs() < 1e-6);
        assert!(center.x.abs() < 1e-6 && center.y.abs() < 1e-6);

        // 列優先で平行移動成分は12, 13番目
        assert_eq!(projection.as_array()[12], -1.0);
        assert_eq!(projection.as_array()[15], 1.0);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(TAU + 1.0) - 1.0).abs() < 1e-5);
        assert!((degrees_to_radians(180.0) - PI).abs() < 1e-6);
    }
}
