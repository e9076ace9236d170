//! `DownloadFile`: raw bytes of a file asset.

use compass_core::Result;

use crate::CompassClient;

const PATH: &str = "/Services/FileAssets.svc/DownloadFile";

pub(crate) fn download_path(asset_id: &str) -> String {
    format!("{PATH}?id={}", urlencoding::encode(asset_id))
}

impl CompassClient {
    /// Download a file asset (lesson plan, attachment) by id.
    ///
    /// # Errors
    ///
    /// Precondition or transport errors. A missing asset surfaces as the
    /// portal's non-2xx status.
    pub async fn download_file(&self, asset_id: &str) -> Result<Vec<u8>> {
        let bytes = self.session().download(&download_path(asset_id)).await?;
        tracing::debug!(asset_id, size = bytes.len(), "file asset downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_is_encoded() {
        assert_eq!(
            download_path("3f2a-11&x"),
            "/Services/FileAssets.svc/DownloadFile?id=3f2a-11%26x"
        );
    }
}
