//! 固定時間ステップ制御モジュール
//!
//! 可変のフレーム時間を固定長のティックに変換します。
//! 経過時間は「ティック単位」で累積され、1以上たまるごとに1ティック実行されます。

/// ループの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// まだ時間が与えられていない
    Idle,
    /// 次のティックまで時間を累積中
    Accumulating,
    /// ティックを実行中
    Stepping,
    /// 終了済み（以降の呼び出しはすべて無視される）
    Terminated,
}

/// 固定時間ステップ制御
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    /// 累積量（ティック単位）
    accumulator: f64,
    /// 1秒あたりのティック数
    ticks_per_second: f64,
    /// 1フレームあたりの最大ティック数（Noneなら無制限）
    max_ticks_per_frame: Option<usize>,
    /// 現在のフレームで実行したティック数
    ticks_this_frame: usize,
    /// 現在の状態
    state: LoopState,
}

impl FixedTimestep {
    /// 新しい固定時間ステップ制御を作成
    ///
    /// # 引数
    ///
    /// * `ticks_per_second` - 1秒あたりのティック数（正の有限値であること）
    /// * `max_ticks_per_frame` - 1フレームあたりの最大ティック数
    pub fn new(ticks_per_second: f64, max_ticks_per_frame: Option<usize>) -> Self {
        Self {
            accumulator: 0.0,
            ticks_per_second,
            max_ticks_per_frame: max_ticks_per_frame.map(|max| max.max(1)),
            ticks_this_frame: 0,
            state: LoopState::Idle,
        }
    }

    /// 経過時間（秒）を累積
    pub fn accumulate(&mut self, elapsed_secs: f64) {
        if self.state == LoopState::Terminated {
            return;
        }
        if !elapsed_secs.is_finite() || elapsed_secs < 0.0 {
            log::warn!("ignoring invalid elapsed time {}", elapsed_secs);
            return;
        }

        self.accumulator += elapsed_secs * self.ticks_per_second;
        self.ticks_this_frame = 0;
        self.state = LoopState::Accumulating;
    }

    /// 次のティックを開始できるか判定し、できる場合は累積量を1減らす
    ///
    /// # 戻り値
    ///
    /// ティックを実行すべき場合はtrue
    pub fn begin_tick(&mut self) -> bool {
        match self.state {
            LoopState::Terminated | LoopState::Idle => return false,
            _ => {}
        }

        if let Some(max) = self.max_ticks_per_frame {
            if self.ticks_this_frame >= max && self.accumulator >= 1.0 {
                // 処理が追いつかない分は捨てる
                let dropped = self.accumulator.floor();
                log::debug!("dropping {} ticks beyond the per-frame cap of {}", dropped, max);
                self.accumulator -= dropped;
            }
        }

        if self.accumulator >= 1.0 {
            self.accumulator -= 1.0;
            self.ticks_this_frame += 1;
            self.state = LoopState::Stepping;
            true
        } else {
            self.state = LoopState::Accumulating;
            false
        }
    }

    /// 残り時間の補間係数（0.0〜1.0）
    pub fn alpha(&self) -> f64 {
        self.accumulator.clamp(0.0, 1.0)
    }

    /// 終了状態へ移行
    pub fn shutdown(&mut self) {
        self.state = LoopState::Terminated;
        self.accumulator = 0.0;
    }

    /// 現在の状態
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// 終了済みかどうか
    pub fn is_terminated(&self) -> bool {
        self.state == LoopState::Terminated
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(60.0, None)
    }
}
