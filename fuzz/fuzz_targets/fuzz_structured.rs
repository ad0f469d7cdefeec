#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Line {
    Key(u8, String),
    Bullet(String),
    Open { array: bool, nested: bool, freeform: bool, slug: u8 },
    Close,
    End,
    Skip,
    EndSkip,
    Ignore,
    Text(String),
}

fn render(lines: &[Line]) -> String {
    let mut s = String::new();
    for l in lines {
        match l {
            Line::Key(k, v) => s.push_str(&format!("k{}: {}", k % 8, v.replace('\n', " "))),
            Line::Bullet(v) => s.push_str(&format!("* {}", v.replace('\n', " "))),
            Line::Open { array, nested, freeform, slug } => {
                let (open, close) = if *array { ('[', ']') } else { ('{', '}') };
                s.push(open);
                if *nested {
                    s.push('.');
                }
                if *freeform {
                    s.push('+');
                }
                s.push_str(&format!("s{}", slug % 4));
                s.push(close);
            }
            Line::Close => s.push_str("[]"),
            Line::End => s.push_str(":end"),
            Line::Skip => s.push_str(":skip"),
            Line::EndSkip => s.push_str(":endskip"),
            Line::Ignore => s.push_str(":ignore"),
            Line::Text(t) => s.push_str(&t.replace('\n', " ")),
        }
        s.push('\n');
    }
    s
}

fuzz_target!(|lines: Vec<Line>| {
    let src = render(&lines);
    let doc = archie::parse_str(&src, &archie::Options::default());
    assert!(doc.is_object());
});
