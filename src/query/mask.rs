pub const NAME_VISIBLE_CHARS: usize = 4;
pub const MASK_CHAR: char = '*';
pub const MASK_LEN: usize = 4;

/// 표시 이름 마스킹: 고정 길이 마스크 + 끝 4글자
pub fn mask_name(full_name: &str) -> String {
    let char_count = full_name.chars().count();
    let visible: String = full_name
        .chars()
        .skip(char_count.saturating_sub(NAME_VISIBLE_CHARS))
        .collect();

    let mut masked = String::with_capacity(MASK_LEN + visible.len());
    masked.extend(std::iter::repeat(MASK_CHAR).take(MASK_LEN));
    masked.push_str(&visible);
    masked
}
