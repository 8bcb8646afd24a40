// A small program to print out the user's ip.

fn main() {
    match easyreq::get("https://api.ipify.org", &[("format", "text")]) {
        // The answer is plain text, so the body stays raw.
        Ok(response) => println!("{}", response.body().as_str().unwrap_or("")),
        Err(err) => println!("[ERROR]: {}", err),
    }
}
