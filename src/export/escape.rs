// ==========================================
// 课表日历导出系统 - iCalendar 文本转义
// ==========================================
// 规则（顺序敏感,反斜杠必须最先转义）:
//   \ → \\    , → \,    ; → \;    换行 → \n
// ==========================================

/// 单行内容最大字节数（RFC 5545 3.1）
pub const MAX_LINE_OCTETS: usize = 75;

/// 转义 SUMMARY / DESCRIPTION 文本
///
/// CRLF 与单独的 CR 先归一为 LF,内容行中不留裸 CR
pub fn escape_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace('\n', "\\n")
}

/// escape_text 的逆操作
pub fn unescape_text(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// 按 75 字节折行,续行以单个空格开头;不拆分 UTF-8 字符
pub fn fold_line(line: &str, eol: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + line.len() / MAX_LINE_OCTETS * 3);
    let mut width = 0;
    for ch in line.chars() {
        let n = ch.len_utf8();
        if width + n > MAX_LINE_OCTETS {
            out.push_str(eol);
            out.push(' ');
            width = 1;
        }
        out.push(ch);
        width += n;
    }
    out
}
