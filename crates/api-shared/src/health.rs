use crate::wire::HealthRes;

/// Health check shared by the server binary and the REST router.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Reports the service as alive together with the number of catalog entries it serves.
    ///
    /// # Arguments
    /// * `catalog_size` - Number of codes loaded into the catalog.
    ///
    /// # Returns
    /// A `HealthRes` that is `ok` only when the catalog is non-empty.
    pub fn check_health(catalog_size: usize) -> HealthRes {
        let ok = catalog_size > 0;
        let message = if ok {
            format!("MedCodes is alive ({catalog_size} codes loaded)")
        } else {
            "MedCodes is alive but the code catalog is empty".into()
        };

        HealthRes {
            ok,
            message,
            catalog_size: catalog_size as u32,
        }
    }
}
