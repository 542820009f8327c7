//! Message splitting for Telegram's length limit.

/// Split `text` into chunks of at most `limit` characters, preferring line
/// boundaries. A single line longer than the limit is hard-split.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if current_len > 0 && current_len + 1 + line_len > limit {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len > limit {
            let mut pieces = hard_split(line, limit);
            // The final (possibly short) piece stays open for more lines.
            let tail = pieces.pop();
            chunks.extend(pieces);
            if let Some(tail) = tail {
                current_len = tail.chars().count();
                current = tail;
            }
            continue;
        }

        if current_len > 0 {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn hard_split(line: &str, limit: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut len = 0usize;
    for ch in line.chars() {
        if len == limit {
            pieces.push(std::mem::take(&mut piece));
            len = 0;
        }
        piece.push(ch);
        len += 1;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
