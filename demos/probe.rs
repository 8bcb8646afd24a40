// A small program to check whether a URL still answers.

fn main() {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("http://example.com"));
    if easyreq::exists(&url) {
        println!("{} is alive", url);
    } else {
        println!("{} is not answering", url);
    }
}
