use crate::common::check;

#[test]
fn autowire_expand_empty() {
    check(
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo;
  wire o1;

  /*AUTOWIRE*/

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo;
  wire o1;

  /*AUTOWIRE*/
  // Beginning of automatic wires (for undeclared instantiated-module outputs)
  wire [7:0][7:0] io;  // To/From b of bar
  wire [31:0] o2[8];  // From b of bar
  // End of automatics

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(o2  /*[31:0].[8]*/)
  );
endmodule
",
    );
}

#[test]
fn autowire_no_expand() {
    check(
        r"
module bar;
endmodule

module foo;
  /*AUTOWIRE*/

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar;
endmodule

module foo;
  /*AUTOWIRE*/

  bar b (  /*AUTOINST*/);
endmodule
",
    );

    // AUTOWIRE belongs in the body; inside the header it is inert.
    check(
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo (  /*AUTOWIRE*/);
  wire o1;

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo (  /*AUTOWIRE*/);
  wire o1;

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(o2  /*[31:0].[8]*/)
  );
endmodule
",
    );
}

#[test]
fn autowire_replaces_stale_block() {
    check(
        r"
module bar (
    input  i1,
    output o1
);
  input i2;
  inout [7:0][7:0] io;
  output o2;
endmodule

module foo;
  wire o1;

  /*AUTOWIRE*/
  // Beginning of automatic wires (for undeclared instantiated-module outputs)
  wire out1;  // From b of bar
  wire [7:0][7:0] in_out;  // To/From b of bar
  wire out2;  // From b of bar
  // End of automatics

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input  i1,
    output o1
);
  input i2;
  inout [7:0][7:0] io;
  output o2;
endmodule

module foo;
  wire o1;

  /*AUTOWIRE*/
  // Beginning of automatic wires (for undeclared instantiated-module outputs)
  wire [7:0][7:0] io;  // To/From b of bar
  wire o2;  // From b of bar
  // End of automatics

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1),
      .o2(o2)
  );
endmodule
",
    );
}

#[test]
fn autoreg_expand_empty() {
    check(
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo;
  output [15:0] o1;
  output [31:0] o2[8];
  output [3:0][3:0] o3[16];
  output o4;

  reg o4;

  /*AUTOREG*/

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo;
  output [15:0] o1;
  output [31:0] o2[8];
  output [3:0][3:0] o3[16];
  output o4;

  reg o4;

  /*AUTOREG*/
  // Beginning of automatic regs (for this module's undeclared outputs)
  reg [3:0][3:0] o3[16];
  // End of automatics

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(o2  /*[31:0].[8]*/)
  );
endmodule
",
    );
}

#[test]
fn autoreg_no_expand() {
    check(
        r"
module foo;
  output o;
  reg o;
  /*AUTOREG*/
endmodule
",
        r"
module foo;
  output o;
  reg o;
  /*AUTOREG*/
endmodule
",
    );

    // AUTOREG belongs in the body; inside the header it is inert.
    check(
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo (  /*AUTOREG*/);
  output [15:0] o1;
  output [31:0] o2[8];
  output [3:0][3:0] o3[16];

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo (  /*AUTOREG*/);
  output [15:0] o1;
  output [31:0] o2[8];
  output [3:0][3:0] o3[16];

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(o2  /*[31:0].[8]*/)
  );
endmodule
",
    );
}

#[test]
fn autoreg_replaces_stale_block() {
    check(
        r"
module bar (
    input  i1,
    output o1
);
  input i2;
  inout [7:0][7:0] io;
  output o2;
endmodule

module foo;
  output o1;
  output o2;
  output o3;

  /*AUTOREG*/
  // Beginning of automatic regs (for this module's undeclared outputs)
  reg out_3;
  // End of automatics

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input  i1,
    output o1
);
  input i2;
  inout [7:0][7:0] io;
  output o2;
endmodule

module foo;
  output o1;
  output o2;
  output o3;

  /*AUTOREG*/
  // Beginning of automatic regs (for this module's undeclared outputs)
  reg o3;
  // End of automatics

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1),
      .o2(o2)
  );
endmodule
",
    );
}

#[test]
fn autoreg_and_autowire_together() {
    check(
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
  /*AUTOREG*/
endmodule

module foo;
  /*AUTOWIRE*/

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
  /*AUTOREG*/
  // Beginning of automatic regs (for this module's undeclared outputs)
  reg [15:0] o1;
  reg [31:0] o2[8];
  // End of automatics
endmodule

module foo;
  /*AUTOWIRE*/
  // Beginning of automatic wires (for undeclared instantiated-module outputs)
  wire [15:0] o1;  // From b of bar
  wire [7:0][7:0] io;  // To/From b of bar
  wire [31:0] o2[8];  // From b of bar
  // End of automatics

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(o2  /*[31:0].[8]*/)
  );
endmodule
",
    );

    check(
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo;
  output oo;

  /*AUTOREG*/

  /*AUTOWIRE*/

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];
endmodule

module foo;
  output oo;

  /*AUTOREG*/
  // Beginning of automatic regs (for this module's undeclared outputs)
  reg oo;
  // End of automatics

  /*AUTOWIRE*/
  // Beginning of automatic wires (for undeclared instantiated-module outputs)
  wire [15:0] o1;  // From b of bar
  wire [7:0][7:0] io;  // To/From b of bar
  wire [31:0] o2[8];  // From b of bar
  // End of automatics

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(o2  /*[31:0].[8]*/)
  );
endmodule
",
    );
}

#[test]
fn port_directives_with_auto_vars() {
    check(
        r"
module qux (
    input [1:0][7:0] ii,
    output [3:0] oo[5][3]
);
endmodule

module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];

  /*AUTOWIRE*/

  /*AUTOREG*/

  qux q (  /*AUTOINST*/);
endmodule

module foo (  /*AUTOARG*/);
  /*AUTOINPUT*/
  /*AUTOOUTPUT*/
  /*AUTOINOUT*/

  bar b (  /*AUTOINST*/);
endmodule
",
        r"
module qux (
    input [1:0][7:0] ii,
    output [3:0] oo[5][3]
);
endmodule

module bar (
    input i1,
    output [15:0] o1
);
  input i2[4][8];
  inout [7:0][7:0] io;
  output [31:0] o2[8];

  /*AUTOWIRE*/
  // Beginning of automatic wires (for undeclared instantiated-module outputs)
  wire [3:0] oo[5][3];  // From q of qux
  // End of automatics

  /*AUTOREG*/
  // Beginning of automatic regs (for this module's undeclared outputs)
  reg [15:0] o1;
  reg [31:0] o2[8];
  // End of automatics

  qux q (  /*AUTOINST*/
      // Inputs
      .ii(ii  /*[1:0][7:0]*/),
      // Outputs
      .oo(oo  /*[3:0].[5][3]*/)
  );
endmodule

module foo (  /*AUTOARG*/
    // Inputs
    i1,
    i2,
    // Inouts
    io,
    // Outputs
    o1,
    o2
);
  /*AUTOINPUT*/
  // Beginning of automatic inputs (from autoinst inputs)
  input i1;  // To b of bar
  input i2[4][8];  // To b of bar
  // End of automatics
  /*AUTOOUTPUT*/
  // Beginning of automatic outputs (from autoinst outputs)
  output [15:0] o1;  // From b of bar
  output [31:0] o2[8];  // From b of bar
  // End of automatics
  /*AUTOINOUT*/
  // Beginning of automatic inouts (from autoinst inouts)
  inout [7:0][7:0] io;  // To/From b of bar
  // End of automatics

  bar b (  /*AUTOINST*/
      // Inputs
      .i1(i1),
      .i2(i2  /*.[4][8]*/),
      // Inouts
      .io(io  /*[7:0][7:0]*/),
      // Outputs
      .o1(o1[15:0]),
      .o2(o2  /*[31:0].[8]*/)
  );
endmodule
",
    );
}
