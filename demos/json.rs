/// This example posts a body and deserializes the JSON answer into a
/// plain struct with Serde.

#[derive(serde::Deserialize)]
struct Answer {
    data: String,
}

fn main() -> Result<(), easyreq::Error> {
    let response = easyreq::post("http://httpbin.org/anything", "Hello, world!")?;
    let answer: Answer = response.json()?;
    println!("{}", answer.data);
    Ok(())
}
