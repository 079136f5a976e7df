use crate::crypto::algorithm::AlgorithmType;

/// Options that decide which tokens are accepted when decoding and validating
///
/// The defaults are strict: unsecured (`"alg":"none"`) tokens are rejected,
/// unknown algorithm names are unsupported and `exp` is checked without leeway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    algorithm: Option<AlgorithmType>,
    leeway: u32,
    ignore_exp: bool,
    allow_unsecured: bool,
    allow_custom_algorithms: bool,
}

impl Config {
    /// Start constructing a Config
    pub fn create() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// The only algorithm a validated token may use, if restricted
    pub fn expected_algorithm(&self) -> Option<&AlgorithmType> {
        self.algorithm.as_ref()
    }

    /// Seconds of clock skew tolerated when checking `exp`
    pub fn leeway(&self) -> u32 {
        self.leeway
    }

    pub fn ignores_exp(&self) -> bool {
        self.ignore_exp
    }

    pub fn allows_unsecured(&self) -> bool {
        self.allow_unsecured
    }

    pub fn allows_custom_algorithms(&self) -> bool {
        self.allow_custom_algorithms
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    algorithm: Option<AlgorithmType>,
    leeway: u32,
    ignore_exp: bool,
    allow_unsecured: bool,
    allow_custom_algorithms: bool,
}

impl ConfigBuilder {
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Only accept tokens whose `"alg"` is `algorithm`
    ///
    /// The algorithm is otherwise taken from the token's own header, so a verifier
    /// holding an RSA public key should set this to stop that key being used as an
    /// HMAC secret.
    pub fn algorithm(&mut self, algorithm: AlgorithmType) -> &mut Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Sets a leeway (in seconds) that should be allowed when checking exp
    pub fn leeway(&mut self, leeway: u32) -> &mut Self {
        self.leeway = leeway;
        self
    }

    /// Don't check the 'exp' expiry claim
    pub fn ignore_exp(&mut self) -> &mut Self {
        self.ignore_exp = true;
        self
    }

    /// Accept tokens with `"alg":"none"` and an empty signature
    ///
    /// Anyone can forge such a token, so only enable this when the token's
    /// integrity is guaranteed some other way.
    pub fn allow_unsecured(&mut self) -> &mut Self {
        self.allow_unsecured = true;
        self
    }

    /// Decode unrecognized (non-JWE) `alg` names as [`AlgorithmType::Custom`](crate::AlgorithmType::Custom)
    /// so they can be checked with a caller-supplied [`Validator`](crate::Validator)
    pub fn allow_custom_algorithms(&mut self) -> &mut Self {
        self.allow_custom_algorithms = true;
        self
    }

    /// Build the final Config
    pub fn build(&self) -> Config {
        Config {
            algorithm: self.algorithm.clone(),
            leeway: self.leeway,
            ignore_exp: self.ignore_exp,
            allow_unsecured: self.allow_unsecured,
            allow_custom_algorithms: self.allow_custom_algorithms,
        }
    }
}
