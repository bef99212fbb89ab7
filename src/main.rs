#[tokio::main]
async fn main() {
    txinvoice::run().await;
}
