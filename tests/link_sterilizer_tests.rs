use blog_guard::{REJECTED_LINK, sterilize_link};

#[test]
fn test_rejection_marker_value() {
    assert_eq!(REJECTED_LINK, "#");
}

#[test]
fn test_blank_links() {
    assert_eq!(sterilize_link(""), sterilize_link("   "));
    assert_eq!(sterilize_link(""), "#");
}

#[test]
fn test_open_redirect_shapes() {
    let cases = [
        ("/", "/"),
        ("/about", "/about"),
        ("//evil.com", "#"),
        ("/\\evil.com", "#"),
        ("//evil.com/path?next=/", "#"),
        ("evil.com", "#"),
    ];
    for (input, expected) in cases {
        assert_eq!(sterilize_link(input), expected, "input: {input:?}");
    }
}

#[test]
fn test_ssrf_shapes() {
    let cases = [
        "http://127.0.0.1/x",
        "http://localhost",
        "http://localhost./",
        "http://192.168.1.5/admin",
        "http://10.0.0.9",
        "https://172.20.1.1:8443/",
    ];
    for input in cases {
        assert_eq!(sterilize_link(input), "#", "input: {input:?}");
    }
}

#[test]
fn test_public_links_untouched() {
    let cases = [
        "https://example.com/path",
        "http://example.com",
        "https://blog.example.org/post/2024/01/01/hello-world?utm=x#comments",
    ];
    for input in cases {
        assert_eq!(sterilize_link(input), input);
    }
}
