use dpk_util::hash::sha1_digest;

/// A repository base URL paired with one architecture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub name: String,
    pub arch: String,
    /// First three bytes of the SHA-1 of [`Repository::url`], in lowercase hex.
    /// Keeps local index file names distinct per repository.
    pub discriminator: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, arch: impl Into<String>) -> Self {
        let name = name.into();
        let arch = arch.into();
        let url = index_url(&name, &arch);
        let discriminator = hex::encode(&sha1_digest(url.as_bytes())[..3]);
        Self {
            name,
            arch,
            discriminator,
        }
    }

    /// Location of the compressed index archive.
    pub fn url(&self) -> String {
        index_url(&self.name, &self.arch)
    }

    /// Local file name of the downloaded archive.
    pub fn archive_name(&self) -> String {
        format!("APKINDEX.{}.tar.gz", self.discriminator)
    }

    /// Local file name of the extracted plain-text index.
    pub fn index_name(&self) -> String {
        format!("APKINDEX.{}", self.discriminator)
    }
}

fn index_url(repo: &str, arch: &str) -> String {
    format!("{}/{arch}/APKINDEX.tar.gz", repo.trim_end_matches('/'))
}
