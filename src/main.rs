#[tokio::main]
async fn main() {
    bookwell_backend::run().await;
}
