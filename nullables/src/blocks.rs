//! Nullable block stream.

use feeder_rpc::NewBlock;
use tokio::sync::mpsc;

/// A block channel pre-filled with `heights` whose sender is already
/// dropped, so the receiver ends after the last block.
pub fn scripted_blocks(heights: impl IntoIterator<Item = u64>) -> mpsc::Receiver<NewBlock> {
    let heights: Vec<u64> = heights.into_iter().collect();
    let (tx, rx) = mpsc::channel(heights.len().max(1));
    for height in heights {
        // Capacity covers every block.
        let _ = tx.try_send(NewBlock { height });
    }
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_heights_then_closes() {
        let mut rx = scripted_blocks([10, 11]);
        assert_eq!(rx.recv().await, Some(NewBlock { height: 10 }));
        assert_eq!(rx.recv().await, Some(NewBlock { height: 11 }));
        assert_eq!(rx.recv().await, None);
    }
}
