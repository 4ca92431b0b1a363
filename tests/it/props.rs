use chatflags::{parse_command, Node};
use proptest::prelude::*;

fn values(tokens: &[String]) -> Vec<Node> {
    tokens.iter().map(|it| Node::Value(it.clone())).collect()
}

proptest! {
    #[test]
    fn parsing_never_panics(line in "\\PC*") {
        let _ = parse_command(&line);
    }

    #[test]
    fn bare_tokens_keep_order_and_identity(
        tokens in prop::collection::vec("[a-zA-Z0-9_]{1,8}", 0..8),
    ) {
        let line = format!("cmd {}", tokens.join(" "));
        let tree = parse_command(&line).unwrap();
        prop_assert_eq!(tree.root(), Some("cmd"));
        let expected = values(&tokens);
        prop_assert_eq!(tree.nodes(), expected.as_slice());
    }

    #[test]
    fn quoted_content_is_kept_verbatim(content in "[a-zA-Z0-9 _.,!?-]*") {
        let tree = parse_command(&format!("cmd '{content}' \"{content}\"")).unwrap();
        let expected = values(&[content.clone(), content]);
        prop_assert_eq!(tree.nodes(), expected.as_slice());
    }

    #[test]
    fn parsing_is_deterministic(
        line in "[a-z]{1,4}( (-[a-z]{1,3}|--[a-z]{1,3}|[a-z0-9]{1,3}|'[a-z ]*')){0,6}",
    ) {
        prop_assert_eq!(parse_command(&line), parse_command(&line));
    }
}
