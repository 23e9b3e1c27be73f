/// Current wall-clock time as unix seconds (spec §3: "all timestamps are
/// unix seconds, signed 64-bit").
pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
