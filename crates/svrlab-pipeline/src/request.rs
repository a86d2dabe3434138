use serde::{Deserialize, Serialize};
use svrlab_core::{Result, SvrError, TrainingError};
use svrlab_svm::{Gamma, SVRParams};

/// Gamma as sent by the client: a policy name or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GammaSetting {
    Value(f64),
    Policy(String),
}

impl Default for GammaSetting {
    fn default() -> Self {
        GammaSetting::Policy("scale".into())
    }
}

impl GammaSetting {
    pub fn to_gamma(&self) -> std::result::Result<Gamma, TrainingError> {
        match self {
            GammaSetting::Value(g) => Ok(Gamma::Value(*g)),
            GammaSetting::Policy(p) => p.parse(),
        }
    }
}

fn default_c() -> f64 {
    1.0
}

fn default_epsilon() -> f64 {
    0.1
}

fn default_kernel() -> String {
    "rbf".into()
}

fn default_degree() -> u32 {
    3
}

fn default_test_size() -> f64 {
    0.2
}

fn default_random_state() -> u64 {
    42
}

/// Hyperparameters and column choices for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRequest {
    #[serde(rename = "C", default = "default_c")]
    pub c: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default)]
    pub gamma: GammaSetting,
    #[serde(default = "default_kernel")]
    pub kernel: String,
    /// Polynomial kernel only.
    #[serde(default = "default_degree")]
    pub degree: u32,
    #[serde(default)]
    pub coef0: f64,
    pub target_column: String,
    #[serde(default)]
    pub feature_columns: Option<Vec<String>>,
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

impl TrainingRequest {
    /// A request with every hyperparameter at its default.
    pub fn new(target_column: impl Into<String>) -> Self {
        TrainingRequest {
            c: default_c(),
            epsilon: default_epsilon(),
            gamma: GammaSetting::default(),
            kernel: default_kernel(),
            degree: default_degree(),
            coef0: 0.0,
            target_column: target_column.into(),
            feature_columns: None,
            test_size: default_test_size(),
            random_state: default_random_state(),
        }
    }

    /// Parse the JSON `parameters` form field.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| SvrError::InvalidRequest {
            reason: e.to_string(),
        })
    }

    /// Validated solver hyperparameters.
    pub fn to_params(&self) -> std::result::Result<SVRParams, TrainingError> {
        let params = SVRParams {
            c: self.c,
            epsilon: self.epsilon,
            kernel: self.kernel.parse()?,
            gamma: self.gamma.to_gamma()?,
            degree: self.degree,
            coef0: self.coef0,
            ..Default::default()
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svrlab_svm::KernelKind;

    #[test]
    fn test_defaults() {
        let req = TrainingRequest::from_json(r#"{"target_column": "y"}"#).unwrap();
        assert_eq!(req, TrainingRequest::new("y"));
        assert_eq!(req.c, 1.0);
        assert_eq!(req.epsilon, 0.1);
        assert_eq!(req.test_size, 0.2);
        assert_eq!(req.random_state, 42);

        let params = req.to_params().unwrap();
        assert_eq!(params.kernel, KernelKind::Rbf);
        assert_eq!(params.gamma, Gamma::Scale);
    }

    #[test]
    fn test_gamma_as_string_or_number() {
        let req = TrainingRequest::from_json(r#"{"target_column": "y", "gamma": 0.5}"#).unwrap();
        assert_eq!(req.gamma, GammaSetting::Value(0.5));
        assert_eq!(req.to_params().unwrap().gamma, Gamma::Value(0.5));

        let req = TrainingRequest::from_json(r#"{"target_column": "y", "gamma": "auto"}"#).unwrap();
        assert_eq!(req.to_params().unwrap().gamma, Gamma::Auto);

        let req = TrainingRequest::from_json(r#"{"target_column": "y", "gamma": "0.25"}"#).unwrap();
        assert_eq!(req.to_params().unwrap().gamma, Gamma::Value(0.25));
    }

    #[test]
    fn test_full_request() {
        let raw = r#"{
            "C": 10.0, "epsilon": 0.05, "gamma": "scale", "kernel": "poly",
            "degree": 2, "coef0": 1.0, "target_column": "price",
            "feature_columns": ["area", "rooms"], "test_size": 0.3, "random_state": 7
        }"#;
        let req = TrainingRequest::from_json(raw).unwrap();
        assert_eq!(req.c, 10.0);
        assert_eq!(req.feature_columns.as_deref(), Some(&["area".to_string(), "rooms".to_string()][..]));
        let params = req.to_params().unwrap();
        assert_eq!(params.kernel, KernelKind::Poly);
        assert_eq!(params.degree, 2);
    }

    #[test]
    fn test_invalid_requests() {
        let err = TrainingRequest::from_json(r#"{"C": 1.0}"#).unwrap_err();
        assert_eq!(err.kind(), "InvalidRequestError");
        assert!(TrainingRequest::from_json("not json").is_err());

        let negative_c = TrainingRequest {
            c: -1.0,
            ..TrainingRequest::new("y")
        };
        assert_eq!(negative_c.to_params().unwrap_err(), TrainingError::InvalidC(-1.0));

        let bad_gamma = TrainingRequest {
            gamma: GammaSetting::Policy("wide".into()),
            ..TrainingRequest::new("y")
        };
        assert!(matches!(
            bad_gamma.to_params(),
            Err(TrainingError::UnknownGammaPolicy(_))
        ));

        let bad_kernel = TrainingRequest {
            kernel: "cubic".into(),
            ..TrainingRequest::new("y")
        };
        assert!(bad_kernel.to_params().is_err());
    }
}
