//! Word and punctuation tokenizer for vector lookup.
//!
//! Words keep their case. English clitics are split off ("don't" becomes
//! "do" + "n't", "she's" becomes "she" + "'s"), each punctuation mark is its
//! own token and runs of dots stay together as an ellipsis.

const CLITICS: [&str; 6] = ["'s", "'re", "'ve", "'ll", "'d", "'m"];

pub fn word_tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if is_word_char(c) {
            let start = i;
            i += 1;
            while i < chars.len() {
                if is_word_char(chars[i]) {
                    i += 1;
                } else if is_joiner(chars[i]) && i + 1 < chars.len() && is_word_char(chars[i + 1]) {
                    i += 2;
                } else {
                    break;
                }
            }
            let word: String = chars[start..i].iter().collect();
            push_word(&mut tokens, word);
        } else if c == '.' {
            let start = i;
            while i < chars.len() && chars[i] == '.' {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        } else {
            tokens.push(c.to_string());
            i += 1;
        }
    }
    tokens
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_joiner(c: char) -> bool {
    matches!(c, '\'' | '’' | '-')
}

fn push_word(tokens: &mut Vec<String>, word: String) {
    let normalized = word.replace('’', "'");
    let lower = normalized.to_ascii_lowercase();

    if lower.len() > 3 && lower.ends_with("n't") {
        let split = normalized.len() - 3;
        tokens.push(normalized[..split].to_string());
        tokens.push(normalized[split..].to_string());
        return;
    }
    for clitic in CLITICS {
        if lower.len() > clitic.len() && lower.ends_with(clitic) {
            let split = normalized.len() - clitic.len();
            tokens.push(normalized[..split].to_string());
            tokens.push(normalized[split..].to_string());
            return;
        }
    }
    tokens.push(normalized);
}
