use crate::image_pipeline::config::parameters::{
    ColorParameters, DetailParameters, DynamicRangeParameters, LookParameters, ProcessingParameters,
};
use crate::image_pipeline::debayer::DemosaicMethod;

impl ProcessingParameters {
    pub fn builder() -> ProcessingParametersBuilder {
        ProcessingParametersBuilder::default()
    }
}

/// Builder for ProcessingParameters
#[derive(Default)]
pub struct ProcessingParametersBuilder {
    demosaic: Option<DemosaicMethod>,
    detail: Option<DetailParameters>,
    dynamic_range: Option<DynamicRangeParameters>,
    color: Option<ColorParameters>,
    look: Option<LookParameters>,
    produce_flat_master: Option<bool>,
}

impl ProcessingParametersBuilder {
    pub fn demosaic(mut self, method: DemosaicMethod) -> Self {
        self.demosaic = Some(method);
        self
    }

    pub fn detail(mut self, detail: DetailParameters) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn dynamic_range(mut self, dynamic_range: DynamicRangeParameters) -> Self {
        self.dynamic_range = Some(dynamic_range);
        self
    }

    pub fn color(mut self, color: ColorParameters) -> Self {
        self.color = Some(color);
        self
    }

    pub fn look(mut self, lut_id: impl Into<String>, intensity: f32) -> Self {
        self.look = Some(LookParameters {
            lut_id: Some(lut_id.into()),
            intensity,
        });
        self
    }

    pub fn produce_flat_master(mut self, enable: bool) -> Self {
        self.produce_flat_master = Some(enable);
        self
    }

    pub fn build(self) -> ProcessingParameters {
        let default = ProcessingParameters::default();
        ProcessingParameters {
            demosaic: self.demosaic.unwrap_or(default.demosaic),
            detail: self.detail.unwrap_or(default.detail),
            dynamic_range: self.dynamic_range.unwrap_or(default.dynamic_range),
            color: self.color.unwrap_or(default.color),
            look: self.look.unwrap_or(default.look),
            produce_flat_master: self.produce_flat_master.unwrap_or(default.produce_flat_master),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_only_given_fields() {
        let params = ProcessingParameters::builder()
            .demosaic(DemosaicMethod::Ahd)
            .look("film", 0.6)
            .produce_flat_master(true)
            .build();

        assert_eq!(params.demosaic, DemosaicMethod::Ahd);
        assert_eq!(params.look.lut_id.as_deref(), Some("film"));
        assert_eq!(params.look.intensity, 0.6);
        assert!(params.produce_flat_master);
        assert_eq!(params.detail, DetailParameters::default());
        assert_eq!(params.color, ColorParameters::default());
    }
}
