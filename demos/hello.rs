/// This is a simple example to demonstrate the usage of this
/// library: fetch a page and print it out.

fn main() -> Result<(), easyreq::Error> {
    let response = easyreq::get("http://example.com", &[])?;
    if let Some(text) = response.body().as_str() {
        println!("{}", text);
    }
    Ok(())
}
