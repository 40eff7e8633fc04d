use cucumber::World;
mod features;

#[tokio::main]
async fn main() {
    // Run every access-layer feature under features/
    features::PlumsortWorld::cucumber().run_and_exit("features/").await;
}
