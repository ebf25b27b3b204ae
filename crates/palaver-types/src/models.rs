/// Key identifying the single conversation shared by two users.
///
/// The pair is sorted lexicographically before joining, so the key is the
/// same no matter which side sends: `conversation_key("bob", "alice")` and
/// `conversation_key("alice", "bob")` both yield `"alice_bob"`. This is what
/// guarantees exactly one conversation per unordered pair.
pub fn conversation_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}_{b}")
    } else {
        format!("{b}_{a}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversation_key_is_symmetric() {
        assert_eq!(conversation_key("alice", "bob"), conversation_key("bob", "alice"));
    }

    #[test]
    fn conversation_key_sorts_lexicographically() {
        assert_eq!(conversation_key("bob", "alice"), "alice_bob");
        assert_eq!(conversation_key("alice", "bob"), "alice_bob");
    }

    #[test]
    fn conversation_key_same_user() {
        assert_eq!(conversation_key("alice", "alice"), "alice_alice");
    }
}
