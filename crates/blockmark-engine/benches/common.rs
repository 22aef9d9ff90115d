// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_block_markup(size: usize) -> String {
    let base = concat!(
        "<!-- wp:heading {\"anchor\":\"intro\"} -->\n<h2>Title</h2>\n<!-- /wp:heading -->\n\n",
        "<!-- wp:paragraph {\"align\":\"center\"} -->\n<p>Paragraph with <em>some</em> content &amp; more.</p>\n<!-- /wp:paragraph -->\n\n",
        "<!-- wp:list -->\n<ul><li>one</li><li>two</li><li>three</li></ul>\n<!-- /wp:list -->\n\n",
        "<!-- wp:quote {\"style\":2} -->\n<blockquote><p>Quoted</p><cite>Someone</cite></blockquote>\n<!-- /wp:quote -->\n\n",
        "<!-- wp:separator /-->\n\n",
    );
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_raw_text(paragraphs: usize) -> String {
    let mut content = String::new();
    for i in 0..paragraphs {
        content.push_str(&format!("## Section {i}\n\n"));
        content.push_str("Some paragraph content with multiple sentences. This helps create realistic document structure for benchmarking.\n\n");
        content.push_str("- first\n- second\n\n");
    }
    content
}

#[allow(dead_code)]
pub fn generate_nested_markup(depth: usize) -> String {
    let mut content = String::new();
    for level in 0..depth {
        content.push_str(&format!("<!-- wp:acme/group -->\n<div class=\"level-{level}\">"));
    }
    content.push_str("<!-- wp:paragraph -->\n<p>deep</p>\n<!-- /wp:paragraph -->");
    for _ in 0..depth {
        content.push_str("</div>\n<!-- /wp:acme/group -->");
    }
    content
}
